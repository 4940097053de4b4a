use time::macros::datetime;

use super::*;

#[test]
fn timestamp_prefix_replaces_separators() {
    let at = datetime!(2024-08-15 10:20:30.123 UTC);
    assert_eq!(timestamp_prefix(at), "2024-08-15T10-20-30-123Z");
}

#[test]
fn timestamp_prefix_normalises_to_utc() {
    let at = datetime!(2024-01-01 01:00:00.005 +3);
    assert_eq!(timestamp_prefix(at), "2023-12-31T22-00-00-005Z");
}

#[test]
fn basename_strips_directories() {
    assert_eq!(basename("part.stl"), "part.stl");
    assert_eq!(basename("../../etc/passwd"), "passwd");
    assert_eq!(basename("C:\\Users\\ada\\bracket.step"), "bracket.step");
    assert_eq!(basename("dir/"), "upload");
    assert_eq!(basename(".."), "upload");
    assert_eq!(basename(""), "upload");
}

#[tokio::test]
async fn save_upload_writes_timestamped_file() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("nested/uploads");
    let file = UploadedFile { name: "sub/part.stl".into(), content_type: "application/sla".into(), bytes: vec![7; 1024] };

    let path = save_upload(&uploads, &file, datetime!(2024-08-15 10:20:30.123 UTC)).await.unwrap();

    assert_eq!(path, uploads.join("2024-08-15T10-20-30-123Z-part.stl"));
    assert_eq!(std::fs::read(&path).unwrap().len(), 1024);
}
