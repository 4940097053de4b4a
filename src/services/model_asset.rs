//! Project model files served from the public directory.

use std::path::Path;

use serde::Serialize;
use viewer::ModelFormat;

/// URL prefix (and directory under the public root) for project models.
pub const PROJECT_MODELS_PATH: &str = "/models/projects/";

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModelAssetError {
    #[error("invalid model file name")]
    InvalidName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub exists: bool,
    pub size: Option<u64>,
    pub size_formatted: String,
    pub url: String,
}

#[must_use]
pub fn model_url(filename: &str) -> String {
    format!("{PROJECT_MODELS_PATH}{filename}")
}

/// True for `/models/projects/<name>` where `<name>` has a viewer-supported
/// extension.
#[must_use]
pub fn is_project_model_path(url: &str) -> bool {
    url.strip_prefix(PROJECT_MODELS_PATH)
        .is_some_and(|name| !name.is_empty() && ModelFormat::from_file_name(name).is_some())
}

/// Human-readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2.25 MB`.
/// Trailing zeros after the decimal point are dropped.
#[must_use]
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let mut text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.truncate(text.trim_end_matches('0').trim_end_matches('.').len());
    }
    format!("{text} {}", SIZE_UNITS[unit])
}

fn validate_name(filename: &str) -> Result<(), ModelAssetError> {
    let plain = !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && filename != ".."
        && !filename.starts_with('.');
    if plain && ModelFormat::from_file_name(filename).is_some() { Ok(()) } else { Err(ModelAssetError::InvalidName) }
}

/// Look up a project model on disk under `public_dir`.
///
/// # Errors
///
/// Returns [`ModelAssetError::InvalidName`] for names with path separators
/// or unsupported extensions.
pub async fn model_info(public_dir: &Path, filename: &str) -> Result<ModelInfo, ModelAssetError> {
    validate_name(filename)?;
    let path = public_dir.join(PROJECT_MODELS_PATH.trim_matches('/')).join(filename);
    let size = match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Some(meta.len()),
        _ => None,
    };
    Ok(ModelInfo {
        exists: size.is_some(),
        size,
        size_formatted: size.map_or_else(|| "Unknown".to_string(), |n| format_bytes(n, 2)),
        url: model_url(filename),
    })
}

#[cfg(test)]
#[path = "model_asset_test.rs"]
mod tests;
