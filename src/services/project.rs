//! Project case-study lookup.
//!
//! DESIGN
//! ======
//! Pages ask for a project by slug. The database is authoritative for
//! PUBLISHED records; when it is not configured, fails, or simply does not
//! know the slug, the built-in catalog answers instead. A database failure is
//! logged and never surfaced to the visitor.
//!
//! Database rows keep list-valued fields as comma-joined text. Conversion to
//! the display shape splits and trims them and drops empty entries.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::{OffsetDateTime, UtcOffset};

use super::catalog::Catalog;

const DEFAULT_PROBLEM: &str = "Project details";
const DEFAULT_DURATION: &str = "-";

// =============================================================================
// DISPLAY SHAPE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Completed,
    InProgress,
    Planned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub duration: String,
    /// `YYYY-MM-DD`.
    pub completed_at: String,
    pub status: ProjectStatus,
    pub technologies: Vec<String>,
    #[serde(rename = "glbUrl", default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ProjectDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ProjectLinks>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub problem: String,
    pub solution: String,
    pub results: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenges: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonial: Option<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub content: String,
    pub author: String,
    pub role: String,
    pub company: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study: Option<String>,
}

/// Head metadata for a project page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub images: Vec<String>,
}

impl PageMeta {
    #[must_use]
    pub fn for_project(project: &Project, images: Vec<String>) -> Self {
        let keywords = project
            .tags
            .iter()
            .map(String::as_str)
            .chain(["LnY", "project", project.category.as_str()])
            .collect::<Vec<_>>()
            .join(", ");
        Self { title: format!("{} - LnY", project.title), description: project.description.clone(), keywords, images }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedProject {
    pub project: Project,
    pub meta: PageMeta,
}

// =============================================================================
// DATABASE ROW
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One row of the `projects` table.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct ProjectRecord {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Option<String>,
    pub technologies: Option<String>,
    pub results: Option<String>,
    pub challenges: Option<String>,
    pub images: Option<String>,
    pub glb_model_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub content: Option<String>,
    pub testimonial_content: Option<String>,
    pub testimonial_author: Option<String>,
    pub testimonial_role: Option<String>,
    pub testimonial_company: Option<String>,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: Option<OffsetDateTime>,
}

/// Split a comma-joined column into trimmed, non-empty entries.
#[must_use]
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect())
        .unwrap_or_default()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty(list: Vec<String>) -> Option<Vec<String>> {
    if list.is_empty() { None } else { Some(list) }
}

fn ymd(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC).date().to_string()
}

impl ProjectRecord {
    #[must_use]
    pub fn page_meta(&self, project: &Project) -> PageMeta {
        let images = non_blank(self.thumbnail_url.clone()).into_iter().collect();
        PageMeta::for_project(project, images)
    }

    #[must_use]
    pub fn into_project(self) -> Project {
        let tags = split_list(self.tags.as_deref());
        let technologies = match split_list(self.technologies.as_deref()) {
            techs if techs.is_empty() => tags.clone(),
            techs => techs,
        };
        let completed_at = self.published_at.or(self.created_at).map(ymd).unwrap_or_default();

        let problem = non_blank(self.problem);
        let solution = non_blank(self.solution);
        let results = split_list(self.results.as_deref());
        let details = if problem.is_some() || solution.is_some() || !results.is_empty() {
            let testimonial = match (non_blank(self.testimonial_content), non_blank(self.testimonial_author)) {
                (Some(content), Some(author)) => Some(Testimonial {
                    content,
                    author,
                    role: self.testimonial_role.unwrap_or_default(),
                    company: self.testimonial_company.unwrap_or_default(),
                }),
                _ => None,
            };
            Some(ProjectDetails {
                problem: problem.unwrap_or_else(|| DEFAULT_PROBLEM.to_string()),
                solution: solution.or(self.content).unwrap_or_default(),
                results,
                challenges: non_empty(split_list(self.challenges.as_deref())),
                testimonial,
            })
        } else {
            None
        };

        let demo = non_blank(self.demo_url);
        let github = non_blank(self.github_url);
        let links = (demo.is_some() || github.is_some()).then(|| ProjectLinks { demo, github, case_study: None });

        Project {
            id: self.slug,
            short_description: self.description.clone(),
            description: self.description,
            title: self.title,
            category: self.category,
            tags,
            duration: non_blank(self.duration).unwrap_or_else(|| DEFAULT_DURATION.to_string()),
            completed_at,
            status: ProjectStatus::Completed,
            technologies,
            model_url: non_blank(self.glb_model_url),
            images: non_empty(split_list(self.images.as_deref())),
            details,
            links,
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Read access to PUBLISHED project records.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn find_published(&self, slug: &str) -> Result<Option<ProjectRecord>, ProjectError>;
    async fn published_slugs(&self) -> Result<Vec<String>, ProjectError>;
}

pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn find_published(&self, slug: &str) -> Result<Option<ProjectRecord>, ProjectError> {
        let row = sqlx::query_as::<_, ProjectRecord>(
            r"SELECT slug, title, description, category, tags, technologies, results,
                     challenges, images, glb_model_url, thumbnail_url, duration, problem,
                     solution, content, testimonial_content, testimonial_author,
                     testimonial_role, testimonial_company, demo_url, github_url,
                     published_at, created_at
              FROM projects
              WHERE slug = $1 AND status = 'PUBLISHED'",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn published_slugs(&self) -> Result<Vec<String>, ProjectError> {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM projects WHERE status = 'PUBLISHED' ORDER BY published_at DESC NULLS LAST, slug",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(slugs)
    }
}

// =============================================================================
// SERVICE
// =============================================================================

#[derive(Clone)]
pub struct ProjectService {
    store: Option<Arc<dyn ProjectStore>>,
    catalog: Arc<Catalog>,
}

impl ProjectService {
    #[must_use]
    pub fn new(store: Option<Arc<dyn ProjectStore>>, catalog: Catalog) -> Self {
        Self { store, catalog: Arc::new(catalog) }
    }

    /// Resolve a slug, database first, then the catalog.
    pub async fn find_project(&self, slug: &str) -> Option<ResolvedProject> {
        if let Some(store) = &self.store {
            match store.find_published(slug).await {
                Ok(Some(record)) => {
                    let project = record.clone().into_project();
                    let meta = record.page_meta(&project);
                    return Some(ResolvedProject { project, meta });
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, %slug, "project lookup failed, using catalog"),
            }
        }

        let project = self.catalog.find(slug)?.clone();
        let meta = PageMeta::for_project(&project, project.images.clone().unwrap_or_default());
        Some(ResolvedProject { project, meta })
    }

    /// Published slugs from the database followed by any catalog slugs it
    /// does not already list.
    pub async fn list_projects(&self) -> Vec<String> {
        let mut slugs = match &self.store {
            Some(store) => store.published_slugs().await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "project listing failed, using catalog");
                Vec::new()
            }),
            None => Vec::new(),
        };
        for slug in self.catalog.slugs() {
            if !slugs.iter().any(|s| s == slug) {
                slugs.push(slug.to_owned());
            }
        }
        slugs
    }
}

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;
