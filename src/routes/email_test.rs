use axum::body::Body;
use axum::http::Request;

use super::*;
use crate::config::{MailConfig, ResendSettings, SmtpPresence, SmtpSettings};
use crate::routes::app;
use crate::routes::test_support::{get, send};
use crate::state::test_helpers::test_app_state;

fn diagnostics_state(dir: &std::path::Path) -> AppState {
    let mut state = test_app_state(dir, dir);
    state.email_diagnostics = true;
    state
}

#[tokio::test]
async fn diagnostics_hidden_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _) = send(app(test_app_state(dir.path(), dir.path())), get("/api/test-email")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_reports_unconfigured_providers() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(diagnostics_state(dir.path())), get("/api/test-email")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["smtp_configured"]["pass"], "NOT_SET");
    assert!(body["smtp_configured"]["host"].is_null());
    assert_eq!(body["resend_configured"], false);
    assert_eq!(body["mail_to"], "info@lnarge.com");
}

#[test]
fn status_never_echoes_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = diagnostics_state(dir.path());
    state.mail = std::sync::Arc::new(MailConfig {
        to: "info@lnarge.com".into(),
        smtp: Some(SmtpSettings {
            host: "smtp.example.com".into(),
            port: 465,
            user: "mailer@example.com".into(),
            pass: "hunter2".into(),
            from: "LnY <mailer@example.com>".into(),
        }),
        smtp_presence: SmtpPresence {
            host: Some("smtp.example.com".into()),
            port: Some("465".into()),
            user: true,
            pass: true,
        },
        resend: Some(ResendSettings { api_key: "re_secret".into(), from: "LnY <noreply@lnarge.com>".into() }),
    });

    let json = serde_json::to_string(&email_status(&state)).unwrap();
    assert!(json.contains("smtp.example.com"));
    assert!(json.contains("\"pass\":\"SET\""));
    assert!(!json.contains("hunter2"));
    assert!(!json.contains("re_secret"));
    assert!(!json.contains("mailer@example.com"));
}

#[test]
fn status_reports_each_smtp_variable_of_a_partial_relay() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = diagnostics_state(dir.path());
    state.mail = std::sync::Arc::new(MailConfig {
        to: "info@lnarge.com".into(),
        smtp: None,
        smtp_presence: SmtpPresence {
            host: Some("smtp.example.com".into()),
            port: None,
            user: true,
            pass: false,
        },
        resend: None,
    });

    let status = email_status(&state);
    assert_eq!(status.smtp_configured.host.as_deref(), Some("smtp.example.com"));
    assert_eq!(status.smtp_configured.port, None);
    assert_eq!(status.smtp_configured.user, "SET");
    assert_eq!(status.smtp_configured.pass, "NOT_SET");
}

#[tokio::test]
async fn test_send_without_smtp_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let req = Request::builder().method("POST").uri("/api/test-email").body(Body::empty()).unwrap();

    let (status, body) = send(app(diagnostics_state(dir.path())), req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "SMTP is not configured");
}
