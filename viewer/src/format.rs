//! Supported 3D interchange formats.
//!
//! A format is recognized by file extension first and by declared MIME type
//! second. Browsers report an empty or generic type for most CAD files, so
//! the extension is the authoritative signal when it is known.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Binary glTF container.
    Glb,
    /// JSON glTF with embedded (data URI) buffers.
    Gltf,
    /// Wavefront OBJ.
    Obj,
    /// Stereolithography, ASCII or binary.
    Stl,
}

impl ModelFormat {
    pub const ALL: [ModelFormat; 4] = [Self::Glb, Self::Gltf, Self::Obj, Self::Stl];

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Glb => "glb",
            Self::Gltf => "gltf",
            Self::Obj => "obj",
            Self::Stl => "stl",
        }
    }

    /// Format for a file extension (without the dot, any case).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "glb" => Some(Self::Glb),
            "gltf" => Some(Self::Gltf),
            "obj" => Some(Self::Obj),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }

    /// Format for a file name or URL path; query strings and fragments are ignored.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let path = name.split(['?', '#']).next().unwrap_or(name);
        let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let (stem, ext) = base.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Self::from_extension(ext)
    }

    /// Format for a declared MIME type. Parameters (`; charset=...`) are ignored.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "model/gltf-binary" => Some(Self::Glb),
            "model/gltf+json" => Some(Self::Gltf),
            "model/obj" | "text/x-wavefront-obj" => Some(Self::Obj),
            "model/stl" | "model/x.stl-binary" | "model/x.stl-ascii" | "application/sla" | "application/vnd.ms-pki.stl" => {
                Some(Self::Stl)
            }
            _ => None,
        }
    }

    /// Resolve a format from a name and an optional declared type.
    #[must_use]
    pub fn detect(name: &str, content_type: Option<&str>) -> Option<Self> {
        Self::from_file_name(name).or_else(|| content_type.and_then(Self::from_content_type))
    }
}

impl std::fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
