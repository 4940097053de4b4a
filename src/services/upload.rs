//! Persisting contact-form attachments.
//!
//! Files land in the uploads directory as `{timestamp}-{basename}`. The
//! timestamp is UTC ISO-8601 with `:` and `.` replaced by `-`, so names sort
//! by arrival and are safe on every filesystem.

use std::path::{Path, PathBuf};

use time::{OffsetDateTime, UtcOffset};

use super::contact::UploadedFile;

const FALLBACK_NAME: &str = "upload";

/// `2024-08-15T10-20-30-123Z`.
#[must_use]
pub fn timestamp_prefix(at: OffsetDateTime) -> String {
    let at = at.to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}-{:02}-{:02}-{:03}Z",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        at.millisecond()
    )
}

/// Last path component of a browser-declared name.
#[must_use]
pub fn basename(declared: &str) -> &str {
    match declared.rsplit(['/', '\\']).next().map(str::trim) {
        Some(name) if !name.is_empty() && name != "." && name != ".." => name,
        _ => FALLBACK_NAME,
    }
}

#[must_use]
pub fn stored_name(at: OffsetDateTime, declared: &str) -> String {
    format!("{}-{}", timestamp_prefix(at), basename(declared))
}

/// Write `file` under `dir`, creating the directory if needed.
///
/// # Errors
///
/// Returns the I/O error if the directory or file cannot be written.
pub async fn save_upload(dir: &Path, file: &UploadedFile, at: OffsetDateTime) -> Result<PathBuf, std::io::Error> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(stored_name(at, &file.name));
    tokio::fs::write(&path, &file.bytes).await?;
    Ok(path)
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
