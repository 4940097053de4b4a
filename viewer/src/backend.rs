//! Rendering capability consumed by the viewer host.
//!
//! The host never talks to a graphics API directly. It hands the backend a
//! [`Scene`] and a camera once per frame; the browser build implements this
//! trait on a Canvas2D context and tests implement it with a recorder.

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::consts::{
    ACCENT, ACCENT_LIGHT_INTENSITY, ACCENT_LIGHT_POSITION, ACCENT_LIGHT_RANGE, AMBIENT_COLOR, AMBIENT_INTENSITY,
    KEY_LIGHT_COLOR, KEY_LIGHT_INTENSITY, KEY_LIGHT_POSITION, MAX_PIXEL_RATIO, SHADOW_MAP_SIZE,
};
use crate::math::Rgb;
use crate::scene::Scene;

/// Size of a rendering surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `None` for a collapsed surface.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn aspect(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.width as f32 / self.height as f32)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Backing-buffer size for a device pixel ratio, capped at [`MAX_PIXEL_RATIO`].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn buffer_size(&self, device_pixel_ratio: f64) -> SurfaceSize {
        let ratio = clamp_pixel_ratio(device_pixel_ratio);
        SurfaceSize {
            width: (f64::from(self.width) * ratio).round() as u32,
            height: (f64::from(self.height) * ratio).round() as u32,
        }
    }
}

/// Clamp a reported device pixel ratio into `[1, MAX_PIXEL_RATIO]`.
#[must_use]
pub fn clamp_pixel_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() { ratio.clamp(1.0, MAX_PIXEL_RATIO) } else { 1.0 }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { color: Rgb, intensity: f32 },
    Directional { color: Rgb, intensity: f32, position: Vec3, cast_shadow: bool, shadow_map_size: u32 },
    Point { color: Rgb, intensity: f32, position: Vec3, range: f32 },
}

/// Ambient fill, a shadow-casting key light and the brand accent light.
#[must_use]
pub fn standard_lights() -> Vec<Light> {
    vec![
        Light::Ambient { color: AMBIENT_COLOR, intensity: AMBIENT_INTENSITY },
        Light::Directional {
            color: KEY_LIGHT_COLOR,
            intensity: KEY_LIGHT_INTENSITY,
            position: KEY_LIGHT_POSITION,
            cast_shadow: true,
            shadow_map_size: SHADOW_MAP_SIZE,
        },
        Light::Point {
            color: ACCENT,
            intensity: ACCENT_LIGHT_INTENSITY,
            position: ACCENT_LIGHT_POSITION,
            range: ACCENT_LIGHT_RANGE,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("surface is not attached")]
    NotAttached,
    #[error("draw failed: {0}")]
    Draw(String),
}

pub trait RenderBackend {
    /// Create the output surface, size it and append it to the container.
    ///
    /// # Errors
    ///
    /// Returns an error when no rendering context can be created.
    fn attach_surface(&mut self, size: SurfaceSize, device_pixel_ratio: f64) -> Result<(), BackendError>;

    fn resize(&mut self, size: SurfaceSize, device_pixel_ratio: f64);

    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// Returns an error when the surface is gone or drawing fails.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), BackendError>;

    /// Remove the output surface from the container. Called once on dispose.
    fn detach_surface(&mut self);
}
