//! The scene graph the viewer actually needs: a background colour, the
//! standard lights and at most one model subtree.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use crate::backend::{Light, standard_lights};
use crate::math::Rgb;
use crate::model::ModelSubtree;

#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Rgb,
    pub lights: Vec<Light>,
    model: Option<ModelSubtree>,
}

impl Scene {
    #[must_use]
    pub fn new(background: Rgb) -> Self {
        Self { background, lights: standard_lights(), model: None }
    }

    #[must_use]
    pub fn model(&self) -> Option<&ModelSubtree> {
        self.model.as_ref()
    }

    /// Attach `model`, returning the subtree it replaced.
    pub fn attach_model(&mut self, model: ModelSubtree) -> Option<ModelSubtree> {
        self.model.replace(model)
    }

    pub fn detach_model(&mut self) -> Option<ModelSubtree> {
        self.model.take()
    }

    /// Number of attached model subtrees (0 or 1).
    #[must_use]
    pub fn model_count(&self) -> usize {
        usize::from(self.model.is_some())
    }
}
