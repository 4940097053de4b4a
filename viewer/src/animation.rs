//! Animation driver: a small clip mixer advanced once per rendered frame.
//!
//! Every embedded clip gets one looping action. Pausing sets the mixer's time
//! scale to zero so each action keeps its current time and resuming continues
//! from the paused pose.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use crate::model::AnimationClip;

/// Playback state of one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipAction {
    pub name: String,
    pub duration: f32,
    /// Current local time in `[0, duration)`.
    pub time: f32,
    pub running: bool,
}

/// Advances every clip action of one model subtree.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    actions: Vec<ClipAction>,
    time_scale: f32,
    disposed: bool,
}

impl AnimationDriver {
    /// Create a driver with one running action per clip. Playback advances
    /// only when `autoplay` is set; otherwise the actions wait at time zero.
    #[must_use]
    pub fn new(clips: &[AnimationClip], autoplay: bool) -> Self {
        let actions = clips
            .iter()
            .map(|clip| ClipAction { name: clip.name.clone(), duration: clip.duration, time: 0.0, running: true })
            .collect();
        Self { actions, time_scale: if autoplay { 1.0 } else { 0.0 }, disposed: false }
    }

    /// Advance all running actions by `delta_secs`, wrapping at each clip's end.
    pub fn update(&mut self, delta_secs: f32) {
        if self.disposed {
            return;
        }
        let step = delta_secs * self.time_scale;
        if step == 0.0 {
            return;
        }
        for action in self.actions.iter_mut().filter(|a| a.running) {
            action.time = if action.duration > 0.0 { (action.time + step).rem_euclid(action.duration) } else { 0.0 };
        }
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.time_scale = if playing { 1.0 } else { 0.0 };
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        !self.disposed && self.time_scale > 0.0
    }

    #[must_use]
    pub fn actions(&self) -> &[ClipAction] {
        &self.actions
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Stop every action and release them. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for action in &mut self.actions {
            action.running = false;
        }
        self.actions.clear();
        self.time_scale = 0.0;
        self.disposed = true;
    }
}
