//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API routes live under `/api`. Everything else falls through to the
//! public directory (pages, images, `/models/projects/*`) served as static
//! files.

pub mod contact;
pub mod email;
pub mod models;
pub mod projects;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::services::contact::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Request body cap. Sits above the upload limit so an oversize file still
/// reaches validation and gets a readable error.
pub const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 5 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorBody>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: message.into() }))
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let public = ServeDir::new(state.public_dir.as_path()).append_index_html_on_directories(true);

    Router::new()
        .route("/api/contact", post(contact::submit))
        .route("/api/projects", get(projects::list))
        .route("/api/projects/{slug}", get(projects::show))
        .route("/api/projects/{slug}/model", get(models::project_model))
        .route("/api/models/{filename}", get(models::info))
        .route("/api/test-email", get(email::status).post(email::send_test))
        .route("/healthz", get(healthz))
        .fallback_service(public)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
