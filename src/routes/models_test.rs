use axum::http::StatusCode;

use crate::routes::app;
use crate::routes::test_support::{get, send};
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn existing_model_reports_size() {
    let uploads = tempfile::tempdir().unwrap();
    let public = tempfile::tempdir().unwrap();
    let models = public.path().join("models/projects");
    std::fs::create_dir_all(&models).unwrap();
    std::fs::write(models.join("test-cube.glb"), vec![0u8; 2048]).unwrap();

    let (status, body) =
        send(app(test_app_state(uploads.path(), public.path())), get("/api/models/test-cube.glb")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], true);
    assert_eq!(body["size"], 2048);
    assert_eq!(body["sizeFormatted"], "2 KB");
    assert_eq!(body["url"], "/models/projects/test-cube.glb");
}

#[tokio::test]
async fn missing_model_is_unknown_size() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(test_app_state(dir.path(), dir.path())), get("/api/models/ghost.stl")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], false);
    assert_eq!(body["sizeFormatted"], "Unknown");
}

#[tokio::test]
async fn unsupported_extension_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(test_app_state(dir.path(), dir.path())), get("/api/models/notes.txt")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn encoded_traversal_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _) =
        send(app(test_app_state(dir.path(), dir.path())), get("/api/models/..%2Fsecret.glb")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn project_model_resolves_catalog_glb() {
    let uploads = tempfile::tempdir().unwrap();
    let public = tempfile::tempdir().unwrap();
    let models = public.path().join("models/projects");
    std::fs::create_dir_all(&models).unwrap();
    std::fs::write(models.join("otomotiv-parca.glb"), vec![0u8; 1536]).unwrap();

    let (status, body) = send(
        app(test_app_state(uploads.path(), public.path())),
        get("/api/projects/interaktif-3d-model/model"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], true);
    assert_eq!(body["sizeFormatted"], "1.5 KB");
    assert_eq!(body["url"], "/models/projects/otomotiv-parca.glb");
}

#[tokio::test]
async fn project_model_for_unknown_project_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _) = send(app(test_app_state(dir.path(), dir.path())), get("/api/projects/nope/model")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
