//! Parsed model subtree and bounding-box normalization.
//!
//! A subtree is the flattened result of parsing one asset: every mesh keeps
//! its vertices in model space (node transforms already applied) and the
//! subtree carries a single root transform (uniform scale, then translation)
//! that normalization writes.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use glam::{Mat4, Vec3};

use crate::loader::LoadError;
use crate::math::{Aabb, Rgb};

/// One renderable mesh: an indexed triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub name: Option<String>,
    pub positions: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
    pub color: Rgb,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshNode {
    /// A mesh with shadows off; indices default to sequential triangles.
    #[must_use]
    pub fn new(name: Option<String>, positions: Vec<Vec3>, indices: Option<Vec<u32>>, color: Rgb) -> Self {
        let indices = indices.unwrap_or_else(|| (0..u32::try_from(positions.len()).unwrap_or(u32::MAX)).collect());
        Self { name, positions, indices, color, cast_shadow: false, receive_shadow: false }
    }

    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }

    /// Triangles as vertex triples, skipping any that reference missing vertices.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = *self.positions.get(tri[0] as usize)?;
            let b = *self.positions.get(tri[1] as usize)?;
            let c = *self.positions.get(tri[2] as usize)?;
            Some([a, b, c])
        })
    }
}

/// An embedded animation clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Clip length in seconds.
    pub duration: f32,
}

/// A loaded, displayable model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSubtree {
    pub meshes: Vec<MeshNode>,
    pub clips: Vec<AnimationClip>,
    /// Root translation, applied after `scale`.
    pub translation: Vec3,
    /// Root uniform scale.
    pub scale: f32,
}

impl ModelSubtree {
    #[must_use]
    pub fn new(meshes: Vec<MeshNode>, clips: Vec<AnimationClip>) -> Self {
        Self { meshes, clips, translation: Vec3::ZERO, scale: 1.0 }
    }

    #[must_use]
    pub fn root_transform(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// Bounds of the geometry without the root transform.
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for mesh in &self.meshes {
            aabb.union(&mesh.bounds());
        }
        aabb
    }

    /// Bounds as placed in the scene.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.local_bounds().transformed(&self.root_transform())
    }

    #[must_use]
    pub fn has_animations(&self) -> bool {
        !self.clips.is_empty()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }

    /// Center the model on the origin and scale it so its largest dimension
    /// equals `target_size`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::EmptyModel`] when the model has no vertices or
    /// zero (or non-finite) extent.
    pub fn normalize(&mut self, target_size: f32) -> Result<(), LoadError> {
        let local = self.local_bounds();
        let max_dim = local.max_dimension();
        if local.is_empty() || !max_dim.is_finite() || max_dim <= f32::EPSILON {
            return Err(LoadError::EmptyModel);
        }
        self.scale = target_size / max_dim;
        self.translation = -local.center() * self.scale;
        Ok(())
    }

    pub fn enable_shadows(&mut self) {
        for mesh in &mut self.meshes {
            mesh.cast_shadow = true;
            mesh.receive_shadow = true;
        }
    }
}
