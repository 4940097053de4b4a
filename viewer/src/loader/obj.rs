//! Wavefront OBJ parsing via the `obj` crate. Polygons are fan-triangulated.

use glam::Vec3;

use super::LoadError;
use crate::consts::DEFAULT_MESH_COLOR;
use crate::format::ModelFormat;
use crate::model::{MeshNode, ModelSubtree};

pub(super) fn parse(bytes: &[u8]) -> Result<ModelSubtree, LoadError> {
    let data = ::obj::ObjData::load_buf(bytes).map_err(|e| LoadError::parse(ModelFormat::Obj, e))?;

    let positions = data.position.iter().map(|p| Vec3::from_array(*p)).collect::<Vec<_>>();
    let vertex_count = positions.len();

    let mut indices = Vec::new();
    for object in &data.objects {
        for group in &object.groups {
            for poly in &group.polys {
                let corners = &poly.0;
                for i in 1..corners.len().saturating_sub(1) {
                    for corner in [&corners[0], &corners[i], &corners[i + 1]] {
                        let index = corner.0;
                        if index >= vertex_count {
                            return Err(LoadError::parse(ModelFormat::Obj, format!("vertex index {index} out of range")));
                        }
                        indices.push(u32::try_from(index).map_err(|e| LoadError::parse(ModelFormat::Obj, e))?);
                    }
                }
            }
        }
    }

    if indices.is_empty() {
        return Err(LoadError::EmptyModel);
    }

    let name = data.objects.first().map(|o| o.name.clone());
    let mesh = MeshNode::new(name, positions, Some(indices), DEFAULT_MESH_COLOR);
    Ok(ModelSubtree::new(vec![mesh], Vec::new()))
}
