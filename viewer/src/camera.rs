//! Perspective camera and world → screen projection.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use glam::{Mat4, Vec3, Vec4Swizzles};

use crate::backend::SurfaceSize;
use crate::consts::{CAMERA_FAR, CAMERA_NEAR, DEFAULT_CAMERA_POSITION, DEFAULT_FOV_DEG};

/// A point in screen space (CSS pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A perspective camera looking from `position` at `target`, Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_deg: DEFAULT_FOV_DEG,
            aspect: 1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: DEFAULT_CAMERA_POSITION,
            target: Vec3::ZERO,
        }
    }
}

impl PerspectiveCamera {
    /// Match the aspect ratio to a surface. Degenerate sizes keep the old aspect.
    pub fn set_aspect(&mut self, size: SurfaceSize) {
        if let Some(aspect) = size.aspect() {
            self.aspect = aspect;
        }
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Distance from the camera to its target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Project a world point onto a surface of `width` × `height` pixels.
    ///
    /// Returns the screen point and the normalized depth (`-1` near, `1` far),
    /// or `None` when the point is behind the camera.
    #[must_use]
    pub fn project(&self, view_projection: &Mat4, world: Vec3, width: f64, height: f64) -> Option<(Point, f32)> {
        let clip = *view_projection * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        let x = (f64::from(ndc.x) + 1.0) * 0.5 * width;
        let y = (1.0 - f64::from(ndc.y)) * 0.5 * height;
        Some((Point::new(x, y), ndc.z))
    }
}
