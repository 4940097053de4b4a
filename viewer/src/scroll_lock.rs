//! Page scroll lock shared by every viewer on a page.
//!
//! Each viewer takes a [`ScrollGuard`] while the pointer is over its canvas.
//! The page stops scrolling on the first hold and scrolls again only when the
//! last guard is dropped, so two viewers handing the pointer back and forth
//! never leave the page stuck or unlocked early.

#[cfg(test)]
#[path = "scroll_lock_test.rs"]
mod scroll_lock_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The page capability that actually blocks or restores scrolling.
pub trait PageScroll {
    fn set_scroll_locked(&mut self, locked: bool);
}

struct Shared {
    holds: Cell<usize>,
    page: RefCell<Box<dyn PageScroll>>,
}

impl Shared {
    fn apply(&self, locked: bool) {
        self.page.borrow_mut().set_scroll_locked(locked);
    }
}

/// Reference-counted scroll lock. Clones share the same counter.
#[derive(Clone)]
pub struct ScrollLock {
    shared: Rc<Shared>,
}

impl ScrollLock {
    #[must_use]
    pub fn new(page: impl PageScroll + 'static) -> Self {
        Self { shared: Rc::new(Shared { holds: Cell::new(0), page: RefCell::new(Box::new(page)) }) }
    }

    /// Take a hold. Scrolling is locked on the transition from zero holds.
    #[must_use]
    pub fn acquire(&self) -> ScrollGuard {
        let holds = self.shared.holds.get();
        self.shared.holds.set(holds + 1);
        if holds == 0 {
            self.shared.apply(true);
        }
        ScrollGuard { shared: Rc::clone(&self.shared) }
    }

    /// Number of outstanding holds.
    #[must_use]
    pub fn holds(&self) -> usize {
        self.shared.holds.get()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.holds() > 0
    }
}

impl std::fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollLock").field("holds", &self.holds()).finish()
    }
}

/// One outstanding hold on a [`ScrollLock`]; released on drop.
pub struct ScrollGuard {
    shared: Rc<Shared>,
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        let holds = self.shared.holds.get().saturating_sub(1);
        self.shared.holds.set(holds);
        if holds == 0 {
            self.shared.apply(false);
        }
    }
}

impl std::fmt::Debug for ScrollGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ScrollGuard")
    }
}
