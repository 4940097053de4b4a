//! Design constants for the viewer.

use glam::Vec3;

use crate::math::Rgb;

// ── Model normalization ─────────────────────────────────────────

/// Largest dimension of every loaded model after normalization, in scene units.
pub const TARGET_SIZE: f32 = 2.0;

// ── Camera ──────────────────────────────────────────────────────

/// Vertical field of view in degrees.
pub const DEFAULT_FOV_DEG: f32 = 45.0;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

/// Initial camera position; the camera looks at the origin.
pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(3.0, 3.0, 3.0);

/// Upper bound on the device pixel ratio used for the output buffer.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// ── Controls ────────────────────────────────────────────────────

pub const MIN_DISTANCE: f32 = 1.0;
pub const MAX_DISTANCE: f32 = 10.0;

/// Fraction of the pending orbit delta applied per update when damping is on.
pub const DAMPING_FACTOR: f32 = 0.05;

/// Auto-rotate speed; 2.0 is one full orbit every 30 seconds.
pub const AUTO_ROTATE_SPEED: f32 = 2.0;

/// Quiescent period after an interaction before auto-rotate resumes.
pub const AUTO_ROTATE_RESUME_DELAY_MS: f64 = 3000.0;

/// Per-wheel-step zoom factor.
pub const ZOOM_STEP: f32 = 0.95;

/// Keeps the polar angle away from the poles.
pub const POLAR_EPSILON: f32 = 1e-6;

// ── Frame timing ────────────────────────────────────────────────

/// Delta used for the first frame, before a measured interval exists.
pub const NOMINAL_FRAME_SECS: f32 = 1.0 / 60.0;

/// Measured deltas are clamped to this so a backgrounded tab does not jump clips.
pub const MAX_FRAME_SECS: f32 = 0.1;

// ── Scene ───────────────────────────────────────────────────────

pub const BACKGROUND: Rgb = Rgb(0x001a_1a1a);

/// Brand accent colour.
pub const ACCENT: Rgb = Rgb(0x00f5_c10e);

pub const AMBIENT_COLOR: Rgb = Rgb(0x0040_4040);
pub const AMBIENT_INTENSITY: f32 = 0.8;

pub const KEY_LIGHT_COLOR: Rgb = Rgb(0x00ff_ffff);
pub const KEY_LIGHT_INTENSITY: f32 = 1.2;
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);
pub const SHADOW_MAP_SIZE: u32 = 1024;

pub const ACCENT_LIGHT_INTENSITY: f32 = 0.6;
pub const ACCENT_LIGHT_RANGE: f32 = 20.0;
pub const ACCENT_LIGHT_POSITION: Vec3 = Vec3::new(-3.0, 3.0, -3.0);

/// Surface colour for formats that carry no material.
pub const DEFAULT_MESH_COLOR: Rgb = Rgb(0x00b0_b0b0);
