//! Orbit controls: pointer drag orbits the camera around its target, the
//! wheel zooms within a clamped distance, and an optional auto-rotation
//! runs while the user is not interacting.
//!
//! Input is split into hover and drag. Hovering alone never suspends
//! auto-rotation; dragging or wheeling does, and auto-rotation resumes only
//! after [`AUTO_ROTATE_RESUME_DELAY_MS`] of quiet after the interaction ends.
//! Timestamps are milliseconds from the host's frame clock.

#[cfg(test)]
#[path = "controls_test.rs"]
mod controls_test;

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::{PerspectiveCamera, Point};
use crate::consts::{
    AUTO_ROTATE_RESUME_DELAY_MS, AUTO_ROTATE_SPEED, DAMPING_FACTOR, MAX_DISTANCE, MIN_DISTANCE, POLAR_EPSILON,
    ZOOM_STEP,
};

/// Camera displacement below which an update counts as "no movement".
const MOVE_EPSILON: f32 = 1e-5;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsConfig {
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            enable_damping: true,
            damping_factor: DAMPING_FACTOR,
            enable_zoom: true,
            enable_pan: false,
            auto_rotate: true,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            rotate_speed: 1.0,
        }
    }
}

/// Camera offset from the target in spherical coordinates, Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Azimuth around Y, measured from +Z towards +X.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self { radius: 0.0, theta: 0.0, phi: 0.0 };
        }
        Self { radius, theta: offset.x.atan2(offset.z), phi: (offset.y / radius).clamp(-1.0, 1.0).acos() }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// The gesture currently being tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    /// Pointer is outside the canvas.
    Outside,
    /// Pointer is over the canvas, no button held.
    Hovering,
    /// Orbiting with the primary button.
    Orbiting { last: Point },
    /// Panning with the secondary or middle button.
    Panning { last: Point },
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: ControlsConfig,
    initial: PerspectiveCamera,
    pointer: PointerState,
    /// Pending azimuth/polar rotation, consumed gradually under damping.
    delta_theta: f32,
    delta_phi: f32,
    /// Pending zoom factor applied to the radius on the next update.
    scale: f32,
    pan_offset: Vec3,
    viewport_height: f64,
    last_interaction_ms: Option<f64>,
}

impl OrbitControls {
    /// Bind controls to the camera's current pose, which becomes the reset pose.
    #[must_use]
    pub fn new(config: ControlsConfig, camera: &PerspectiveCamera) -> Self {
        Self {
            config,
            initial: *camera,
            pointer: PointerState::Outside,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            viewport_height: 1.0,
            last_interaction_ms: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Whether a drag gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.pointer, PointerState::Orbiting { .. } | PointerState::Panning { .. })
    }

    /// Whether the pointer is over the canvas (hovering or dragging).
    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.pointer != PointerState::Outside
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.config.auto_rotate = enabled;
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(1.0);
    }

    /// Whether auto-rotation should run at `now_ms`.
    #[must_use]
    pub fn auto_rotate_active(&self, now_ms: f64) -> bool {
        self.config.auto_rotate
            && !self.is_dragging()
            && self.last_interaction_ms.is_none_or(|t| now_ms - t >= AUTO_ROTATE_RESUME_DELAY_MS)
    }

    // --- Input ---

    pub fn pointer_enter(&mut self) {
        if self.pointer == PointerState::Outside {
            self.pointer = PointerState::Hovering;
        }
    }

    /// Leaving the canvas ends any drag.
    pub fn pointer_leave(&mut self, now_ms: f64) {
        if self.is_dragging() {
            self.last_interaction_ms = Some(now_ms);
        }
        self.pointer = PointerState::Outside;
    }

    pub fn pointer_down(&mut self, at: Point, button: Button, now_ms: f64) {
        self.pointer = match button {
            Button::Primary => PointerState::Orbiting { last: at },
            Button::Middle | Button::Secondary if self.config.enable_pan => PointerState::Panning { last: at },
            Button::Middle | Button::Secondary => return,
        };
        self.last_interaction_ms = Some(now_ms);
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn pointer_move(&mut self, at: Point, camera: &PerspectiveCamera) {
        match self.pointer {
            PointerState::Orbiting { last } => {
                let height = self.viewport_height;
                let dx = ((at.x - last.x) / height) as f32;
                let dy = ((at.y - last.y) / height) as f32;
                self.rotate_left(TAU * dx * self.config.rotate_speed);
                self.rotate_up(TAU * dy * self.config.rotate_speed);
                self.pointer = PointerState::Orbiting { last: at };
            }
            PointerState::Panning { last } => {
                self.pan(at.x - last.x, at.y - last.y, camera);
                self.pointer = PointerState::Panning { last: at };
            }
            PointerState::Outside | PointerState::Hovering => {}
        }
    }

    pub fn pointer_up(&mut self, now_ms: f64) {
        if self.is_dragging() {
            self.pointer = PointerState::Hovering;
            self.last_interaction_ms = Some(now_ms);
        }
    }

    /// Wheel zoom. Positive `delta_y` (scroll down) moves the camera away.
    pub fn wheel(&mut self, delta_y: f64, now_ms: f64) {
        if !self.config.enable_zoom || delta_y == 0.0 {
            return;
        }
        if delta_y > 0.0 {
            self.scale /= ZOOM_STEP;
        } else {
            self.scale *= ZOOM_STEP;
        }
        self.last_interaction_ms = Some(now_ms);
    }

    fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Screen-space pan converted to world units at the target's depth.
    #[allow(clippy::cast_possible_truncation)]
    fn pan(&mut self, dx: f64, dy: f64, camera: &PerspectiveCamera) {
        let offset = camera.position - camera.target;
        let target_distance = offset.length() * (camera.fov_deg.to_radians() * 0.5).tan();
        let per_pixel = 2.0 * target_distance / self.viewport_height as f32;
        let forward = (-offset).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        self.pan_offset += right * (-dx as f32 * per_pixel) + up * (dy as f32 * per_pixel);
    }

    // --- Per-frame update ---

    /// Apply pending rotation/zoom/pan and auto-rotation to `camera`.
    /// Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, delta_secs: f32, now_ms: f64) -> bool {
        if self.auto_rotate_active(now_ms) {
            self.rotate_left(TAU / 60.0 * self.config.auto_rotate_speed * delta_secs);
        }

        let before = camera.position;
        let mut spherical = Spherical::from_offset(camera.position - camera.target);
        let factor = if self.config.enable_damping { self.config.damping_factor } else { 1.0 };

        spherical.theta += self.delta_theta * factor;
        spherical.phi = (spherical.phi + self.delta_phi * factor).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.config.min_distance, self.config.max_distance);

        camera.target += self.pan_offset * factor;
        camera.position = camera.target + spherical.to_offset();

        if self.config.enable_damping {
            self.delta_theta *= 1.0 - factor;
            self.delta_phi *= 1.0 - factor;
            self.pan_offset *= 1.0 - factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(before) > MOVE_EPSILON * MOVE_EPSILON
    }

    /// Restore the initial camera pose and clear all pending motion.
    pub fn reset(&mut self, camera: &mut PerspectiveCamera) {
        camera.position = self.initial.position;
        camera.target = self.initial.target;
        camera.fov_deg = self.initial.fov_deg;
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
        self.last_interaction_ms = None;
    }
}
