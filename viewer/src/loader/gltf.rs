//! glTF 2.0 (binary and embedded JSON) parsing via the `gltf` crate.

use glam::{Mat4, Vec3};

use super::LoadError;
use crate::format::ModelFormat;
use crate::math::Rgb;
use crate::model::{AnimationClip, MeshNode, ModelSubtree};

/// Node hierarchies deeper than this are treated as malformed.
const MAX_NODE_DEPTH: usize = 64;

pub(super) fn parse(bytes: &[u8], format: ModelFormat) -> Result<ModelSubtree, LoadError> {
    let (document, buffers, _images) = ::gltf::import_slice(bytes).map_err(|e| LoadError::parse(format, e))?;

    let mut meshes = Vec::new();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                visit_node(&node, Mat4::IDENTITY, &buffers, 0, &mut meshes, format)?;
            }
        }
        None => {
            for mesh in document.meshes() {
                read_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut meshes);
            }
        }
    }

    let clips = document
        .animations()
        .enumerate()
        .map(|(i, animation)| AnimationClip {
            name: animation.name().map_or_else(|| format!("clip-{i}"), str::to_owned),
            duration: clip_duration(&animation, &buffers),
        })
        .collect();

    Ok(ModelSubtree::new(meshes, clips))
}

fn visit_node(
    node: &::gltf::Node<'_>,
    parent: Mat4,
    buffers: &[::gltf::buffer::Data],
    depth: usize,
    out: &mut Vec<MeshNode>,
    format: ModelFormat,
) -> Result<(), LoadError> {
    if depth > MAX_NODE_DEPTH {
        return Err(LoadError::parse(format, "node hierarchy too deep"));
    }
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        read_mesh(&mesh, world, buffers, out);
    }
    for child in node.children() {
        visit_node(&child, world, buffers, depth + 1, out, format)?;
    }
    Ok(())
}

fn read_mesh(mesh: &::gltf::Mesh<'_>, world: Mat4, buffers: &[::gltf::buffer::Data], out: &mut Vec<MeshNode>) {
    for primitive in mesh.primitives() {
        if primitive.mode() != ::gltf::mesh::Mode::Triangles {
            continue;
        }
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions = positions
            .map(|p| world.transform_point3(Vec3::from_array(p)))
            .collect::<Vec<_>>();
        let indices = reader.read_indices().map(|indices| indices.into_u32().collect());
        let [r, g, b, _] = primitive.material().pbr_metallic_roughness().base_color_factor();
        out.push(MeshNode::new(mesh.name().map(str::to_owned), positions, indices, Rgb::from_unit(r, g, b)));
    }
}

/// Last keyframe time across all channels.
fn clip_duration(animation: &::gltf::Animation<'_>, buffers: &[::gltf::buffer::Data]) -> f32 {
    animation
        .channels()
        .filter_map(|channel| {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
            reader.read_inputs().map(|inputs| inputs.fold(0.0_f32, f32::max))
        })
        .fold(0.0_f32, f32::max)
}
