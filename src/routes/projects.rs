//! Project case-study routes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use super::{ApiError, api_error};
use crate::services::project::ResolvedProject;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SlugList {
    pub slugs: Vec<String>,
}

/// `GET /api/projects`: every resolvable slug.
pub async fn list(State(state): State<AppState>) -> Json<SlugList> {
    Json(SlugList { slugs: state.projects.list_projects().await })
}

/// `GET /api/projects/{slug}`: project plus page metadata.
pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<ResolvedProject>, ApiError> {
    state
        .projects
        .find_project(&slug)
        .await
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Project not found"))
}

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;
