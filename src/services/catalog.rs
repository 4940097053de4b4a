//! Built-in project catalog.
//!
//! The catalog ships inside the binary (`data/projects.json`) so project pages
//! still resolve when no database is configured.

use super::project::Project;

const BUILTIN_JSON: &str = include_str!("../../data/projects.json");

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    /// Parse the catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON does not match [`Project`].
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(BUILTIN_JSON)
    }

    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON array of projects.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(Self { projects: serde_json::from_str(raw)? })
    }

    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == slug)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.projects.iter().map(|p| p.id.as_str())
    }
}
