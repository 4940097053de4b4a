//! Rendering: turns the scene into a depth-sorted list of shaded triangles
//! and, under the `web` feature, paints that list onto a 2D canvas.
//!
//! [`build_draw_list`] is pure so it can be tested without a browser. The
//! `draw` function is the only place that touches
//! `web_sys::CanvasRenderingContext2d`; it reads the draw list and produces
//! pixels without mutating any viewer state.
//!
//! Shading is per-face Lambert over the scene's lights. Faces are lit from
//! whichever side faces the camera, since OBJ and STL files often have
//! inconsistent winding. Shadows are not drawn by this renderer.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use glam::Vec3;

use crate::backend::Light;
use crate::camera::{PerspectiveCamera, Point};
use crate::math::Rgb;
use crate::scene::Scene;

/// One projected, shaded triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub points: [Point; 3],
    /// Mean normalized device depth; larger is farther.
    pub depth: f32,
    pub color: Rgb,
}

/// Project and shade every triangle of the attached model, farthest first.
///
/// `width` and `height` are the surface size in CSS pixels. Triangles with a
/// vertex behind the camera are skipped.
#[must_use]
pub fn build_draw_list(scene: &Scene, camera: &PerspectiveCamera, width: f64, height: f64) -> Vec<Face> {
    let Some(model) = scene.model() else {
        return Vec::new();
    };
    let transform = model.root_transform();
    let view_projection = camera.view_projection();
    let mut faces = Vec::with_capacity(model.triangle_count());

    for mesh in &model.meshes {
        let base = mesh.color.to_unit();
        for triangle in mesh.triangles() {
            let world = triangle.map(|v| transform.transform_point3(v));
            let Some(projected) = project_triangle(camera, &view_projection, world, width, height) else {
                continue;
            };
            let centroid = (world[0] + world[1] + world[2]) / 3.0;
            let mut normal = (world[1] - world[0]).cross(world[2] - world[0]).normalize_or_zero();
            if normal.dot(camera.position - centroid) < 0.0 {
                normal = -normal;
            }
            let light = incident_light(&scene.lights, centroid, normal);
            let shaded = (base * light).min(Vec3::ONE);
            faces.push(Face { points: projected.0, depth: projected.1, color: Rgb::from_unit(shaded.x, shaded.y, shaded.z) });
        }
    }

    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    faces
}

fn project_triangle(
    camera: &PerspectiveCamera,
    view_projection: &glam::Mat4,
    world: [Vec3; 3],
    width: f64,
    height: f64,
) -> Option<([Point; 3], f32)> {
    let (a, da) = camera.project(view_projection, world[0], width, height)?;
    let (b, db) = camera.project(view_projection, world[1], width, height)?;
    let (c, dc) = camera.project(view_projection, world[2], width, height)?;
    Some(([a, b, c], (da + db + dc) / 3.0))
}

/// Total light arriving at a surface point, per channel.
fn incident_light(lights: &[Light], at: Vec3, normal: Vec3) -> Vec3 {
    lights.iter().fold(Vec3::ZERO, |sum, light| {
        sum + match *light {
            Light::Ambient { color, intensity } => color.to_unit() * intensity,
            Light::Directional { color, intensity, position, .. } => {
                let lambert = normal.dot(position.normalize_or_zero()).max(0.0);
                color.to_unit() * intensity * lambert
            }
            Light::Point { color, intensity, position, range } => {
                let to_light = position - at;
                let distance = to_light.length();
                let falloff = if range > 0.0 { (1.0 - distance / range).clamp(0.0, 1.0) } else { 1.0 };
                let lambert = normal.dot(to_light.normalize_or_zero()).max(0.0);
                color.to_unit() * intensity * lambert * falloff
            }
        }
    })
}

#[cfg(feature = "web")]
pub use canvas::draw;

#[cfg(feature = "web")]
mod canvas {
    use wasm_bindgen::JsValue;
    use web_sys::CanvasRenderingContext2d;

    use super::Face;
    use crate::math::Rgb;

    /// Paint `faces` over a cleared background.
    ///
    /// `width` and `height` are in CSS pixels; `dpr` is the backing-buffer
    /// scale.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a `Canvas2D` call fails.
    pub fn draw(
        ctx: &CanvasRenderingContext2d,
        faces: &[Face],
        background: Rgb,
        width: f64,
        height: f64,
        dpr: f64,
    ) -> Result<(), JsValue> {
        ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        ctx.set_fill_style_str(&background.to_css());
        ctx.fill_rect(0.0, 0.0, width, height);

        ctx.set_line_width(0.5);
        ctx.set_line_join("round");
        for face in faces {
            let css = face.color.to_css();
            let [a, b, c] = face.points;
            ctx.begin_path();
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
            ctx.line_to(c.x, c.y);
            ctx.close_path();
            ctx.set_fill_style_str(&css);
            ctx.fill();
            // Stroke in the fill colour to hide anti-aliasing seams.
            ctx.set_stroke_style_str(&css);
            ctx.stroke();
        }
        Ok(())
    }
}
