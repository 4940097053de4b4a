use super::*;

#[test]
fn format_bytes_matches_site_output() {
    assert_eq!(format_bytes(0, 2), "0 Bytes");
    assert_eq!(format_bytes(512, 2), "512 Bytes");
    assert_eq!(format_bytes(1024, 2), "1 KB");
    assert_eq!(format_bytes(1536, 2), "1.5 KB");
    assert_eq!(format_bytes(2_359_296, 2), "2.25 MB");
    assert_eq!(format_bytes(1_234_567, 2), "1.18 MB");
    assert_eq!(format_bytes(1_234_567, 0), "1 MB");
    assert_eq!(format_bytes(5 * 1024 * 1024 * 1024, 2), "5 GB");
}

#[test]
fn sizes_beyond_gigabytes_stay_in_gigabytes() {
    assert_eq!(format_bytes(2 * 1024 * 1024 * 1024 * 1024, 1), "2048 GB");
}

#[test]
fn model_url_prefixes_directory() {
    assert_eq!(model_url("test-cube.glb"), "/models/projects/test-cube.glb");
}

#[test]
fn project_model_path_rules() {
    assert!(is_project_model_path("/models/projects/test-cube.glb"));
    assert!(is_project_model_path("/models/projects/part.STL"));
    assert!(!is_project_model_path("/models/backup/test-cube.glb"));
    assert!(!is_project_model_path("/models/projects/readme.txt"));
    assert!(!is_project_model_path("/models/projects/"));
}

#[tokio::test]
async fn model_info_reports_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let models = dir.path().join("models/projects");
    std::fs::create_dir_all(&models).unwrap();
    std::fs::write(models.join("cube.glb"), vec![0u8; 1536]).unwrap();

    let info = model_info(dir.path(), "cube.glb").await.unwrap();
    assert_eq!(
        info,
        ModelInfo {
            exists: true,
            size: Some(1536),
            size_formatted: "1.5 KB".into(),
            url: "/models/projects/cube.glb".into()
        }
    );
}

#[tokio::test]
async fn model_info_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let info = model_info(dir.path(), "missing.obj").await.unwrap();
    assert!(!info.exists);
    assert_eq!(info.size, None);
    assert_eq!(info.size_formatted, "Unknown");
}

#[tokio::test]
async fn model_info_rejects_traversal_and_unknown_types() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["../secret.glb", "a\\b.glb", "notes.txt", ".glb", ""] {
        assert_eq!(model_info(dir.path(), name).await, Err(ModelAssetError::InvalidName), "{name}");
    }
}
