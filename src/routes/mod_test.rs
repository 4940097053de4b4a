use tower::ServiceExt;

use super::test_support::{get, send};
use super::*;
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn healthz_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _) = send(app(test_app_state(dir.path(), dir.path())), get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn public_files_are_served() {
    let uploads = tempfile::tempdir().unwrap();
    let public = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(public.path().join("models/projects")).unwrap();
    std::fs::write(public.path().join("models/projects/cube.glb"), b"glTF").unwrap();

    let resp = app(test_app_state(uploads.path(), public.path()))
        .oneshot(get("/models/projects/cube.glb"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _) = send(app(test_app_state(dir.path(), dir.path())), get("/nope.html")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
