//! Contact form validation.
//!
//! DESIGN
//! ======
//! A submission is checked in a fixed order: required fields, email shape,
//! file type, file size. The first failure wins and is reported to the
//! visitor as a 400 with a human-readable message. Nothing is written or
//! sent until validation passes.

/// Largest accepted upload, in bytes (25 MiB).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".step", ".stp", ".dwg", ".glb", ".gltf", ".obj", ".stl"];

pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/step",
    "application/vnd.step",
    "application/sla",
    "application/dwg",
    "image/vnd.dwg",
    "model/step",
    "model/step+xml",
    "application/x-step",
    "text/plain",
];

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("Name, email and message are required.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Unsupported file type. Allowed: PDF, STEP, DWG, GLB, GLTF, OBJ, STL.")]
    UnsupportedFile,
    #[error("File is too large. The maximum size is 25MB.")]
    FileTooLarge,
    #[error("Invalid form data.")]
    Malformed,
    #[error("Could not save the uploaded file.")]
    Upload(#[source] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name as declared by the browser. May contain path components.
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lower-cased extension including the dot, e.g. `.stl`. Everything
    /// after the last dot of the base name counts, so a bare `.stl` has one.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let base = self.name.rsplit(['/', '\\']).next().unwrap_or(&self.name);
        match base.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => Some(format!(".{}", ext.to_ascii_lowercase())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub service: String,
    pub message: String,
    pub file: Option<UploadedFile>,
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot in the
/// domain with at least one character on each side.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.char_indices().any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// A file passes when either its extension or its declared content type is
/// on the allow list.
#[must_use]
pub fn is_allowed_file(file: &UploadedFile) -> bool {
    let by_extension = file.extension().is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    let content_type = file.content_type.to_ascii_lowercase();
    let by_type = ALLOWED_CONTENT_TYPES.contains(&content_type.as_str());
    by_extension || by_type
}

/// # Errors
///
/// Returns the first rule the submission breaks.
pub fn validate(submission: &ContactSubmission) -> Result<(), ContactError> {
    let blank = |s: &str| s.trim().is_empty();
    if blank(&submission.name) || blank(&submission.email) || blank(&submission.message) {
        return Err(ContactError::MissingFields);
    }
    if !is_valid_email(submission.email.trim()) {
        return Err(ContactError::InvalidEmail);
    }
    if let Some(file) = &submission.file {
        if !is_allowed_file(file) {
            return Err(ContactError::UnsupportedFile);
        }
        if file.size() > MAX_UPLOAD_BYTES {
            return Err(ContactError::FileTooLarge);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
