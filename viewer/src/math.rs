//! Axis-aligned bounding boxes and packed RGB colours.

#[cfg(test)]
#[path = "math_test.rs"]
mod math_test;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box. A freshly created box is empty
/// (`min > max`) until the first point is added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    #[must_use]
    pub fn empty() -> Self {
        Self { min: Vec3::splat(f32::INFINITY), max: Vec3::splat(f32::NEG_INFINITY) }
    }

    #[must_use]
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand(p);
        }
        aabb
    }

    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.expand(other.min);
        self.expand(other.max);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() { Vec3::ZERO } else { self.max - self.min }
    }

    #[must_use]
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    /// Bounding box of this box's eight corners after `transform`.
    #[must_use]
    pub fn transformed(&self, transform: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let (lo, hi) = (self.min, self.max);
        Self::from_points((0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            transform.transform_point3(corner)
        }))
    }
}

/// A `0xRRGGBB` colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Build from linear `[0, 1]` components, clamping out-of-range values.
    #[must_use]
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| u32::from((v.clamp(0.0, 1.0) * 255.0).round() as u8);
        Self((channel(r) << 16) | (channel(g) << 8) | channel(b))
    }

    /// Components as `[0, 1]` floats.
    #[must_use]
    pub fn to_unit(self) -> Vec3 {
        Vec3::new(
            ((self.0 >> 16) & 0xff) as f32 / 255.0,
            ((self.0 >> 8) & 0xff) as f32 / 255.0,
            (self.0 & 0xff) as f32 / 255.0,
        )
    }

    /// CSS hex notation, e.g. `#f5c10e`.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }
}
