//! Project model file info.
//!
//! Only files under `/models/projects/` are reported. Projects whose model
//! lives elsewhere (or nowhere) have no model info.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::{ApiError, api_error};
use crate::services::model_asset::{self, ModelAssetError, ModelInfo, PROJECT_MODELS_PATH};
use crate::state::AppState;

pub(crate) fn model_error_to_status(err: &ModelAssetError) -> StatusCode {
    match err {
        ModelAssetError::InvalidName => StatusCode::BAD_REQUEST,
    }
}

/// `GET /api/models/{filename}`.
pub async fn info(State(state): State<AppState>, Path(filename): Path<String>) -> Result<Json<ModelInfo>, ApiError> {
    model_asset::model_info(&state.public_dir, &filename)
        .await
        .map(Json)
        .map_err(|e| api_error(model_error_to_status(&e), e.to_string()))
}

/// `GET /api/projects/{slug}/model`: info for the project's hosted model.
pub async fn project_model(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ModelInfo>, ApiError> {
    let resolved = state
        .projects
        .find_project(&slug)
        .await
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Project not found"))?;
    let filename = resolved
        .project
        .model_url
        .as_deref()
        .filter(|url| model_asset::is_project_model_path(url))
        .and_then(|url| url.strip_prefix(PROJECT_MODELS_PATH))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Project has no hosted model"))?;

    model_asset::model_info(&state.public_dir, filename)
        .await
        .map(Json)
        .map_err(|e| api_error(model_error_to_status(&e), e.to_string()))
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
