//! Contact notification email.
//!
//! DESIGN
//! ======
//! Providers are tried in order and the first success wins: SMTP when the
//! relay is configured, then Resend. Delivery is a side channel of the
//! contact endpoint: every failure is logged and swallowed, never retried,
//! and never changes the response the visitor gets.
//!
//! Only SMTP carries the uploaded file as an attachment. Resend receives the
//! same HTML body, which names the file and its size.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;
use time::{OffsetDateTime, UtcOffset};

use super::contact::ContactSubmission;
use crate::config::{MailConfig, ResendSettings, SmtpSettings};

const CONTACT_TEMPLATE: &str = include_str!("../../templates/contact_notification.html");
const TEST_TEMPLATE: &str = include_str!("../../templates/test_email.html");
const NOT_SPECIFIED: &str = "Not specified";
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("email build error: {0}")]
    Build(String),
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Resend delivery failed: {0}")]
    Resend(String),
    #[error("SMTP is not configured")]
    NotConfigured,
    #[error("SMTP server did not answer the connection test")]
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub html: String,
    pub reply_to: Option<String>,
    pub attachment: Option<Attachment>,
}

// =============================================================================
// RENDERING
// =============================================================================

#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn or_not_specified(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() { NOT_SPECIFIED.to_string() } else { escape_html(value) }
}

fn display_time(at: OffsetDateTime) -> String {
    let at = at.to_offset(UtcOffset::UTC);
    format!("{} {:02}:{:02}:{:02} UTC", at.date(), at.hour(), at.minute(), at.second())
}

#[must_use]
pub fn contact_subject(submission: &ContactSubmission) -> String {
    let service = submission.service.trim();
    let service = if service.is_empty() { "General" } else { service };
    format!("LnY Contact: {} - {service}", submission.name.trim())
}

/// Build the notification for a validated submission.
#[must_use]
pub fn render_contact_email(submission: &ContactSubmission, sent_at: OffsetDateTime) -> OutgoingEmail {
    let file_row = submission.file.as_ref().map_or_else(String::new, |file| {
        #[allow(clippy::cast_precision_loss)]
        let mb = file.size() as f64 / BYTES_PER_MB;
        format!(
            r#"<p style="margin-top:16px;"><strong>Attached file:</strong> {} ({mb:.2} MB)</p>"#,
            escape_html(&file.name)
        )
    });

    let html = CONTACT_TEMPLATE
        .replace("{{NAME}}", &escape_html(submission.name.trim()))
        .replace("{{EMAIL}}", &escape_html(submission.email.trim()))
        .replace("{{PHONE}}", &or_not_specified(&submission.phone))
        .replace("{{COMPANY}}", &or_not_specified(&submission.company))
        .replace("{{SERVICE}}", &or_not_specified(&submission.service))
        .replace("{{MESSAGE}}", &escape_html(submission.message.trim()))
        .replace("{{FILE_ROW}}", &file_row)
        .replace("{{SENT_AT}}", &display_time(sent_at));

    OutgoingEmail {
        subject: contact_subject(submission),
        html,
        reply_to: Some(submission.email.trim().to_string()),
        attachment: submission.file.as_ref().map(|file| Attachment {
            name: super::upload::basename(&file.name).to_string(),
            content_type: file.content_type.clone(),
            bytes: file.bytes.clone(),
        }),
    }
}

#[must_use]
pub fn render_test_email(host: &str, sent_at: OffsetDateTime) -> OutgoingEmail {
    let html = TEST_TEMPLATE.replace("{{HOST}}", &escape_html(host)).replace("{{SENT_AT}}", &display_time(sent_at));
    OutgoingEmail { subject: "LnY SMTP test".to_string(), html, reply_to: None, attachment: None }
}

// =============================================================================
// PROVIDERS
// =============================================================================

#[async_trait]
pub trait MailProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, to: &str, email: &OutgoingEmail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    #[must_use]
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.settings.host
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let builder = if self.settings.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)?
        };
        Ok(builder
            .port(self.settings.port)
            .credentials(Credentials::new(self.settings.user.clone(), self.settings.pass.clone()))
            .build())
    }

    /// Connect and authenticate without sending anything.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the relay cannot be reached.
    pub async fn verify(&self) -> Result<bool, MailError> {
        Ok(self.transport()?.test_connection().await?)
    }

    /// # Errors
    ///
    /// Returns an error if an address does not parse or the body cannot be
    /// assembled.
    pub fn build_message(&self, to: &str, email: &OutgoingEmail) -> Result<Message, MailError> {
        let mut builder =
            Message::builder().from(self.settings.from.parse::<Mailbox>()?).to(to.parse::<Mailbox>()?).subject(&email.subject);
        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(reply_to.parse::<Mailbox>()?);
        }

        let body = SinglePart::html(email.html.clone());
        let built = match &email.attachment {
            Some(file) => {
                let content_type = ContentType::parse(&file.content_type)
                    .or_else(|_| ContentType::parse("application/octet-stream"))
                    .map_err(|e| MailError::Build(e.to_string()))?;
                let part = MimeAttachment::new(file.name.clone()).body(file.bytes.clone(), content_type);
                builder.multipart(MultiPart::mixed().singlepart(body).singlepart(part))
            }
            None => builder.singlepart(body),
        };
        built.map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailProvider for SmtpMailer {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, to: &str, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(to, email)?;
        self.transport()?.send(message).await?;
        Ok(())
    }
}

pub struct ResendMailer {
    client: Resend,
    from: String,
}

impl ResendMailer {
    #[must_use]
    pub fn new(settings: &ResendSettings) -> Self {
        Self { client: Resend::new(&settings.api_key), from: settings.from.clone() }
    }
}

#[async_trait]
impl MailProvider for ResendMailer {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, to: &str, email: &OutgoingEmail) -> Result<(), MailError> {
        let options = CreateEmailBaseOptions::new(&self.from, [to], &email.subject).with_html(&email.html);
        self.client.emails.send(options).await.map_err(|e| MailError::Resend(e.to_string()))?;
        Ok(())
    }
}

// =============================================================================
// NOTIFIER
// =============================================================================

#[derive(Clone)]
pub struct Notifier {
    to: String,
    smtp: Option<Arc<SmtpMailer>>,
    providers: Vec<Arc<dyn MailProvider>>,
}

impl Notifier {
    #[must_use]
    pub fn from_config(config: &MailConfig) -> Self {
        let smtp = config.smtp.clone().map(|s| Arc::new(SmtpMailer::new(s)));
        let mut providers: Vec<Arc<dyn MailProvider>> = Vec::new();
        if let Some(smtp) = &smtp {
            providers.push(smtp.clone());
        }
        if let Some(resend) = &config.resend {
            providers.push(Arc::new(ResendMailer::new(resend)));
        }
        Self { to: config.to.clone(), smtp, providers }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_providers(to: impl Into<String>, providers: Vec<Arc<dyn MailProvider>>) -> Self {
        Self { to: to.into(), smtp: None, providers }
    }

    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.to
    }

    #[must_use]
    pub fn smtp(&self) -> Option<&SmtpMailer> {
        self.smtp.as_deref()
    }

    /// Try each provider in order. Returns the name of the one that
    /// delivered, or `None` if none did.
    pub async fn deliver(&self, email: &OutgoingEmail) -> Option<&'static str> {
        if self.providers.is_empty() {
            tracing::info!(subject = %email.subject, "no email provider configured, notification skipped");
            return None;
        }
        for provider in &self.providers {
            match provider.send(&self.to, email).await {
                Ok(()) => {
                    tracing::info!(provider = provider.name(), to = %self.to, "notification email sent");
                    return Some(provider.name());
                }
                Err(e) => tracing::warn!(provider = provider.name(), error = %e, "notification email failed"),
            }
        }
        tracing::warn!(subject = %email.subject, "all email providers failed, notification dropped");
        None
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;
