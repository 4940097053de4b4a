//! STL parsing, ASCII and binary.
//!
//! Binary files may also begin with `solid`, so the binary layout is tried
//! first whenever the declared facet count matches the file length exactly.

use glam::Vec3;

use super::LoadError;
use crate::consts::DEFAULT_MESH_COLOR;
use crate::format::ModelFormat;
use crate::model::{MeshNode, ModelSubtree};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

pub(super) fn parse(bytes: &[u8]) -> Result<ModelSubtree, LoadError> {
    let positions = if is_binary(bytes) { parse_binary(bytes)? } else { parse_ascii(bytes)? };
    if positions.is_empty() {
        return Err(LoadError::EmptyModel);
    }
    let mesh = MeshNode::new(None, positions, None, DEFAULT_MESH_COLOR);
    Ok(ModelSubtree::new(vec![mesh], Vec::new()))
}

fn facet_count(bytes: &[u8]) -> Option<usize> {
    let raw = bytes.get(HEADER_LEN..HEADER_LEN + 4)?;
    let mut count = [0u8; 4];
    count.copy_from_slice(raw);
    Some(u32::from_le_bytes(count) as usize)
}

fn is_binary(bytes: &[u8]) -> bool {
    let exact = facet_count(bytes)
        .and_then(|n| n.checked_mul(FACET_LEN))
        .and_then(|n| n.checked_add(HEADER_LEN + 4))
        .is_some_and(|expected| expected == bytes.len());
    exact || !bytes.trim_ascii_start().starts_with(b"solid")
}

fn parse_binary(bytes: &[u8]) -> Result<Vec<Vec3>, LoadError> {
    let count = facet_count(bytes).ok_or_else(|| LoadError::parse(ModelFormat::Stl, "truncated header"))?;
    let body = &bytes[HEADER_LEN + 4..];
    let expected = count
        .checked_mul(FACET_LEN)
        .ok_or_else(|| LoadError::parse(ModelFormat::Stl, "facet count overflow"))?;
    if body.len() < expected {
        return Err(LoadError::parse(
            ModelFormat::Stl,
            format!("expected {count} facets, file holds {}", body.len() / FACET_LEN),
        ));
    }

    let mut positions = Vec::with_capacity(count * 3);
    for facet in body[..expected].chunks_exact(FACET_LEN) {
        // 12-byte normal, three 12-byte vertices, 2-byte attribute count.
        for v in 0..3 {
            let offset = 12 + v * 12;
            positions.push(Vec3::new(
                read_f32(facet, offset),
                read_f32(facet, offset + 4),
                read_f32(facet, offset + 8),
            ));
        }
    }
    Ok(positions)
}

fn read_f32(chunk: &[u8], offset: usize) -> f32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&chunk[offset..offset + 4]);
    f32::from_le_bytes(raw)
}

fn parse_ascii(bytes: &[u8]) -> Result<Vec<Vec3>, LoadError> {
    let text = std::str::from_utf8(bytes).map_err(|e| LoadError::parse(ModelFormat::Stl, e))?;
    let mut positions = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("vertex") {
            continue;
        }
        let coords = parts
            .map(str::parse::<f32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LoadError::parse(ModelFormat::Stl, format!("line {}: {e}", line_no + 1)))?;
        let [x, y, z] = coords[..] else {
            return Err(LoadError::parse(ModelFormat::Stl, format!("line {}: expected 3 coordinates", line_no + 1)));
        };
        positions.push(Vec3::new(x, y, z));
    }
    if positions.len() % 3 != 0 {
        return Err(LoadError::parse(ModelFormat::Stl, "vertex count is not a multiple of 3"));
    }
    Ok(positions)
}
