//! Render loop state machine.
//!
//! ```text
//! Idle ──start──▶ Running ──stop──▶ Stopped
//!   └──────────────stop─────────────────┘
//! ```
//!
//! There is no way back from `Stopped`. The loop owns at most one pending
//! frame request; stopping cancels it, and a frame callback that still
//! arrives afterwards is ignored.

#[cfg(test)]
#[path = "render_loop_test.rs"]
mod render_loop_test;

use crate::consts::{MAX_FRAME_SECS, NOMINAL_FRAME_SECS};

/// Requests and cancels per-frame callbacks (e.g. `requestAnimationFrame`).
pub trait FrameScheduler {
    type Handle: Copy;

    /// Ask for one callback on the next frame. `None` means the platform
    /// refused the request.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    fn cancel_frame(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct RenderLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
    pending: Option<S::Handle>,
    last_frame_ms: Option<f64>,
    frames: u64,
}

impl<S: FrameScheduler> RenderLoop<S> {
    #[must_use]
    pub fn new(scheduler: S) -> Self {
        Self { scheduler, state: LoopState::Idle, pending: None, last_frame_ms: None, frames: 0 }
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames delivered since start.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Start the loop and request the first frame. Only valid from `Idle`;
    /// if the first request is refused the loop goes straight to `Stopped`.
    pub fn start(&mut self) -> bool {
        if self.state != LoopState::Idle {
            return false;
        }
        self.state = LoopState::Running;
        self.schedule();
        self.is_running()
    }

    /// Handle a frame callback at `now_ms`. Returns the frame delta in
    /// seconds, or `None` when the loop is not running.
    ///
    /// The delta is measured from the previous frame and clamped to
    /// [`MAX_FRAME_SECS`]; the first frame uses [`NOMINAL_FRAME_SECS`].
    /// The next frame is requested before returning.
    #[allow(clippy::cast_possible_truncation)]
    pub fn on_frame(&mut self, now_ms: f64) -> Option<f32> {
        if self.state != LoopState::Running {
            return None;
        }
        self.pending = None;
        let delta = match self.last_frame_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_SECS),
            None => NOMINAL_FRAME_SECS,
        };
        self.last_frame_ms = Some(now_ms);
        self.frames += 1;
        self.schedule();
        Some(delta)
    }

    /// Cancel the pending frame and stop for good. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.state = LoopState::Stopped;
    }

    fn schedule(&mut self) {
        match self.scheduler.request_frame() {
            Some(handle) => self.pending = Some(handle),
            None => {
                log::warn!("frame request refused; stopping render loop");
                self.state = LoopState::Stopped;
            }
        }
    }
}
