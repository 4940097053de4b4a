//! Model loading: source → format check → bytes → parsed, normalized subtree.
//!
//! DESIGN
//! ======
//! Format detection runs before any network access, so an unsupported URL
//! never costs a fetch. Fetching goes through [`AssetFetcher`] so the browser
//! build can use `fetch()` while tests hand back canned bytes. Parsing is
//! synchronous and backend-free; every parser produces the same flattened
//! [`ModelSubtree`], which is then normalized to the target size and marked
//! for shadows.

mod gltf;
mod obj;
mod stl;


use async_trait::async_trait;

use crate::consts::TARGET_SIZE;
use crate::format::ModelFormat;
use crate::model::ModelSubtree;

// =============================================================================
// ERROR
// =============================================================================

/// Why a model could not be displayed. Surfaced into the viewer session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported model format: {name} (supported: .glb, .gltf, .obj, .stl)")]
    UnsupportedFormat { name: String },

    #[error("failed to fetch model: {0}")]
    Fetch(String),

    #[error("model request failed with status {0}")]
    HttpStatus(u16),

    #[error("malformed {format} data: {message}")]
    Parse { format: ModelFormat, message: String },

    #[error("model contains no displayable geometry")]
    EmptyModel,
}

impl LoadError {
    pub(crate) fn parse(format: ModelFormat, message: impl std::fmt::Display) -> Self {
        Self::Parse { format, message: message.to_string() }
    }
}

// =============================================================================
// SOURCES AND PROGRESS
// =============================================================================

/// Where a model comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    /// A URL serving the model file.
    Url(String),
    /// A locally supplied file.
    File { name: String, content_type: Option<String>, bytes: Vec<u8> },
}

impl ModelSource {
    /// The declared file name (last URL path segment for URLs, without query
    /// or fragment).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or(url);
                match path.rsplit('/').next() {
                    Some(segment) if !segment.is_empty() => segment,
                    _ => url,
                }
            }
            Self::File { name, .. } => name,
        }
    }

    /// Resolve the format without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedFormat`] when neither the name nor the
    /// declared content type identifies a supported format.
    pub fn format(&self) -> Result<ModelFormat, LoadError> {
        let detected = match self {
            Self::Url(url) => ModelFormat::from_file_name(url),
            Self::File { name, content_type, .. } => ModelFormat::detect(name, content_type.as_deref()),
        };
        detected.ok_or_else(|| LoadError::UnsupportedFormat { name: self.name().to_owned() })
    }
}

/// Bytes received so far. `total` is `None` when the server did not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    /// `loaded / total` in `[0, 1]`, when the total is known and non-zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> Option<f32> {
        match self.total {
            Some(total) if total > 0 => Some((self.loaded as f32 / total as f32).min(1.0)),
            _ => None,
        }
    }
}

/// Retrieves model bytes for a URL.
#[async_trait(?Send)]
pub trait AssetFetcher {
    /// Fetch `url`, reporting progress as bytes arrive where possible.
    async fn fetch(&self, url: &str, progress: &mut dyn FnMut(LoadProgress)) -> Result<Vec<u8>, LoadError>;
}

// =============================================================================
// LOADER
// =============================================================================

/// Turns a [`ModelSource`] into a normalized [`ModelSubtree`].
#[derive(Debug, Clone, Copy)]
pub struct ModelLoader {
    target_size: f32,
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self { target_size: TARGET_SIZE }
    }
}

impl ModelLoader {
    #[must_use]
    pub fn new(target_size: f32) -> Self {
        Self { target_size }
    }

    #[must_use]
    pub fn target_size(&self) -> f32 {
        self.target_size
    }

    /// Load, parse and normalize a model.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] for unsupported formats, fetch failures and
    /// malformed or empty model data.
    pub async fn load<F: AssetFetcher + ?Sized>(
        &self,
        source: ModelSource,
        fetcher: &F,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<ModelSubtree, LoadError> {
        let format = source.format()?;
        let bytes = match source {
            ModelSource::Url(url) => {
                log::debug!("fetching {format} model from {url}");
                fetcher.fetch(&url, progress).await?
            }
            ModelSource::File { bytes, .. } => {
                let len = bytes.len() as u64;
                progress(LoadProgress { loaded: len, total: Some(len) });
                bytes
            }
        };
        self.parse(&bytes, format)
    }

    /// Parse bytes of a known format and normalize the result.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] for malformed data and
    /// [`LoadError::EmptyModel`] when nothing can be displayed.
    pub fn parse(&self, bytes: &[u8], format: ModelFormat) -> Result<ModelSubtree, LoadError> {
        let mut model = match format {
            ModelFormat::Glb | ModelFormat::Gltf => gltf::parse(bytes, format)?,
            ModelFormat::Obj => obj::parse(bytes)?,
            ModelFormat::Stl => stl::parse(bytes)?,
        };
        model.normalize(self.target_size)?;
        model.enable_shadows();
        log::debug!(
            "parsed {format} model: {} meshes, {} triangles, {} clips",
            model.meshes.len(),
            model.triangle_count(),
            model.clips.len()
        );
        Ok(model)
    }
}
