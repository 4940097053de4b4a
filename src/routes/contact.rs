//! `POST /api/contact`: multipart contact form.
//!
//! The handler parses the form, validates it, stores the optional file, logs
//! one structured line and then hands the notification to the mail
//! providers. Mail failures never change the response.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::Serialize;
use time::OffsetDateTime;

use super::{ApiError, api_error};
use crate::services::contact::{self, ContactError, ContactSubmission, UploadedFile};
use crate::services::{notify, upload};
use crate::state::AppState;

const SUCCESS_MESSAGE: &str = "Thank you! Your message has been received and we will get back to you shortly.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub message: &'static str,
    pub file_uploaded: bool,
}

pub(crate) fn contact_error_to_status(err: &ContactError) -> StatusCode {
    match err {
        ContactError::MissingFields
        | ContactError::InvalidEmail
        | ContactError::UnsupportedFile
        | ContactError::FileTooLarge
        | ContactError::Malformed => StatusCode::BAD_REQUEST,
        ContactError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn contact_error(err: ContactError) -> ApiError {
    let status = contact_error_to_status(&err);
    if status.is_server_error() {
        tracing::error!(error = ?err, "contact submission failed");
    }
    api_error(status, err.to_string())
}

/// Collect the known form fields. A `file` part with no bytes counts as no
/// file.
async fn read_submission(mut multipart: Multipart) -> Result<ContactSubmission, ContactError> {
    let mut submission = ContactSubmission::default();
    while let Some(field) = multipart.next_field().await.map_err(|_| ContactError::Malformed)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let content_type = field.content_type().unwrap_or_default().to_owned();
            let bytes = field.bytes().await.map_err(|_| ContactError::Malformed)?;
            if !bytes.is_empty() {
                submission.file = Some(UploadedFile { name: file_name, content_type, bytes: bytes.to_vec() });
            }
            continue;
        }
        let value = field.text().await.map_err(|_| ContactError::Malformed)?;
        match name.as_str() {
            "name" => submission.name = value,
            "email" => submission.email = value,
            "phone" => submission.phone = value,
            "company" => submission.company = value,
            "service" => submission.service = value,
            "message" => submission.message = value,
            _ => {}
        }
    }
    Ok(submission)
}

pub async fn submit(State(state): State<AppState>, multipart: Multipart) -> Result<Json<ContactResponse>, ApiError> {
    let submission = read_submission(multipart).await.map_err(contact_error)?;
    contact::validate(&submission).map_err(contact_error)?;

    let now = OffsetDateTime::now_utc();
    let saved = match &submission.file {
        Some(file) => Some(
            upload::save_upload(&state.uploads_dir, file, now)
                .await
                .map_err(|e| contact_error(ContactError::Upload(e)))?,
        ),
        None => None,
    };

    let file = submission.file.as_ref();
    let saved_path = saved.as_ref().map(|p| p.display().to_string());
    tracing::info!(
        name = %submission.name.trim(),
        email = %submission.email.trim(),
        service = %submission.service.trim(),
        file_name = file.map(|f| f.name.as_str()),
        file_size = file.map(UploadedFile::size),
        file_type = file.map(|f| f.content_type.as_str()),
        saved_path = saved_path.as_deref(),
        "contact form submission"
    );

    let email = notify::render_contact_email(&submission, now);
    state.notifier.deliver(&email).await;

    Ok(Json(ContactResponse { message: SUCCESS_MESSAGE, file_uploaded: saved.is_some() }))
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
