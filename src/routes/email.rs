//! Email diagnostics.
//!
//! `GET /api/test-email` reports which mail settings are present and
//! `POST /api/test-email` sends a test message through SMTP. Both answer 404
//! unless `EMAIL_DIAGNOSTICS` is enabled. Secrets are reported as
//! `SET`/`NOT_SET`, never echoed.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;

use crate::services::notify::{self, MailError, MailProvider};
use crate::state::AppState;

const SET: &str = "SET";
const NOT_SET: &str = "NOT_SET";

#[derive(Debug, Serialize)]
pub struct SmtpStatus {
    pub host: Option<String>,
    pub port: Option<String>,
    pub user: &'static str,
    pub pass: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EmailStatus {
    pub smtp_configured: SmtpStatus,
    pub resend_configured: bool,
    pub mail_to: String,
}

#[derive(Debug, Serialize)]
pub struct TestResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub(crate) fn mail_error_to_status(err: &MailError) -> StatusCode {
    match err {
        MailError::Address(_)
        | MailError::Build(_)
        | MailError::Smtp(_)
        | MailError::Resend(_)
        | MailError::NotConfigured
        | MailError::Unreachable => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn email_status(state: &AppState) -> EmailStatus {
    let smtp = &state.mail.smtp_presence;
    let presence = |present: bool| if present { SET } else { NOT_SET };
    EmailStatus {
        smtp_configured: SmtpStatus {
            host: smtp.host.clone(),
            port: smtp.port.clone(),
            user: presence(smtp.user),
            pass: presence(smtp.pass),
        },
        resend_configured: state.mail.resend.is_some(),
        mail_to: state.mail.to.clone(),
    }
}

pub async fn status(State(state): State<AppState>) -> Response {
    if !state.email_diagnostics {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(email_status(&state)).into_response()
}

async fn send_test_email(state: &AppState) -> Result<String, MailError> {
    let smtp = state.notifier.smtp().ok_or(MailError::NotConfigured)?;
    if !smtp.verify().await? {
        return Err(MailError::Unreachable);
    }
    let email = notify::render_test_email(smtp.host(), OffsetDateTime::now_utc());
    smtp.send(state.notifier.recipient(), &email).await?;
    Ok(format!("Test email sent to {}", state.notifier.recipient()))
}

pub async fn send_test(State(state): State<AppState>) -> Response {
    if !state.email_diagnostics {
        return StatusCode::NOT_FOUND.into_response();
    }
    match send_test_email(&state).await {
        Ok(message) => Json(TestResult { success: true, message: Some(message), error: None }).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "test email failed");
            let body = TestResult { success: false, message: None, error: Some(e.to_string()) };
            (mail_error_to_status(&e), Json(body)).into_response()
        }
    }
}

#[cfg(test)]
#[path = "email_test.rs"]
mod tests;
