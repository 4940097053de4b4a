//! Project-coloured fallback cube, shown when a project has no model or
//! its model failed to load.

#[cfg(test)]
#[path = "placeholder_test.rs"]
mod placeholder_test;

use glam::Vec3;

use crate::consts::ACCENT;
use crate::math::Rgb;
use crate::model::{MeshNode, ModelSubtree};

const PROJECT_COLORS: &[(&str, Rgb)] = &[
    ("otomotiv-parca-cfd", Rgb(0x00ff_6b6b)),
    ("endustriyel-otomasyon", Rgb(0x004e_cdc4)),
    ("interaktif-3d-model", Rgb(0x00ff_e66d)),
    ("tubitak-1501", Rgb(0x0095_e1d3)),
];

/// Colour for a project slug; unknown or missing slugs get the brand accent.
#[must_use]
pub fn placeholder_color(slug: Option<&str>) -> Rgb {
    slug.and_then(|slug| PROJECT_COLORS.iter().find(|(s, _)| *s == slug))
        .map_or(ACCENT, |(_, color)| *color)
}

/// A unit cube centred on the origin, scaled so each edge is `target_size`.
#[must_use]
pub fn placeholder_cube(slug: Option<&str>, target_size: f32) -> ModelSubtree {
    let corners: Vec<Vec3> = (0..8u8)
        .map(|i| {
            let pick = |bit: u8| if i & bit == 0 { -0.5 } else { 0.5 };
            Vec3::new(pick(1), pick(2), pick(4))
        })
        .collect();
    // Two counter-clockwise triangles per face, viewed from outside.
    let indices = vec![
        0, 2, 3, 0, 3, 1, // -z
        4, 5, 7, 4, 7, 6, // +z
        0, 1, 5, 0, 5, 4, // -y
        2, 6, 7, 2, 7, 3, // +y
        0, 4, 6, 0, 6, 2, // -x
        1, 3, 7, 1, 7, 5, // +x
    ];
    let mesh = MeshNode::new(Some("placeholder".to_owned()), corners, Some(indices), placeholder_color(slug));
    let mut cube = ModelSubtree::new(vec![mesh], Vec::new());
    cube.scale = target_size;
    cube.enable_shadows();
    cube
}
