//! Service configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present) and then builds one [`SiteConfig`] before
//! binding the listener. Everything optional degrades to a disabled feature:
//! no `DATABASE_URL` means the static catalog only, no mail settings means
//! contact submissions are logged but not forwarded.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_MAIL_TO: &str = "info@lnarge.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_RESEND_FROM: &str = "LnY Contact <noreply@lnarge.com>";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

/// SMTP relay settings. Only built when host, user and password are all set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl SmtpSettings {
    /// Port 465 speaks TLS from the first byte; everything else upgrades
    /// with STARTTLS.
    #[must_use]
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendSettings {
    pub api_key: String,
    pub from: String,
}

/// Raw SMTP variables as found, whether or not they add up to a usable relay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmtpPresence {
    pub host: Option<String>,
    pub port: Option<String>,
    pub user: bool,
    pub pass: bool,
}

impl SmtpPresence {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env_nonempty("SMTP_HOST"),
            port: env_nonempty("SMTP_PORT"),
            user: env_nonempty("SMTP_USER").is_some(),
            pass: env_nonempty("SMTP_PASS").is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// Inbox that receives contact notifications.
    pub to: String,
    pub smtp: Option<SmtpSettings>,
    /// Per-variable view for diagnostics; a partial relay shows up here even
    /// though `smtp` is `None`.
    pub smtp_presence: SmtpPresence,
    pub resend: Option<ResendSettings>,
}

impl MailConfig {
    /// Read mail settings.
    ///
    /// - `MAIL_TO`: default `info@lnarge.com`
    /// - `SMTP_HOST`, `SMTP_USER`, `SMTP_PASS`: all three enable SMTP
    /// - `SMTP_PORT`: default 587
    /// - `SMTP_FROM`: default `"LnY Contact" <SMTP_USER>`
    /// - `RESEND_API_KEY`: enables the Resend fallback
    /// - `RESEND_FROM`: default `LnY Contact <noreply@lnarge.com>`
    #[must_use]
    pub fn from_env() -> Self {
        let smtp = match (env_nonempty("SMTP_HOST"), env_nonempty("SMTP_USER"), env_nonempty("SMTP_PASS")) {
            (Some(host), Some(user), Some(pass)) => {
                let from = env_nonempty("SMTP_FROM").unwrap_or_else(|| format!("\"LnY Contact\" <{user}>"));
                Some(SmtpSettings { host, port: env_parse_u16("SMTP_PORT", DEFAULT_SMTP_PORT), user, pass, from })
            }
            _ => None,
        };
        let resend = env_nonempty("RESEND_API_KEY").map(|api_key| ResendSettings {
            api_key,
            from: env_nonempty("RESEND_FROM").unwrap_or_else(|| DEFAULT_RESEND_FROM.to_string()),
        });

        Self {
            to: env_nonempty("MAIL_TO").unwrap_or_else(|| DEFAULT_MAIL_TO.to_string()),
            smtp,
            smtp_presence: SmtpPresence::from_env(),
            resend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub uploads_dir: PathBuf,
    pub public_dir: PathBuf,
    pub mail: MailConfig,
    /// Exposes `/api/test-email` when true.
    pub email_diagnostics: bool,
}

impl SiteConfig {
    /// Build the full service config.
    ///
    /// - `PORT`: default 3000
    /// - `DATABASE_URL`: optional
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `UPLOADS_DIR`: default `uploads`
    /// - `PUBLIC_DIR`: default `public`
    /// - `EMAIL_DIAGNOSTICS`: default false
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] when `PORT` is set but is not a
    /// port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env_nonempty("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            database_url: env_nonempty("DATABASE_URL"),
            db_max_connections: env_parse_u32("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            uploads_dir: env_nonempty("UPLOADS_DIR").map_or_else(|| PathBuf::from(DEFAULT_UPLOADS_DIR), PathBuf::from),
            public_dir: env_nonempty("PUBLIC_DIR").map_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR), PathBuf::from),
            mail: MailConfig::from_env(),
            email_diagnostics: env_bool("EMAIL_DIAGNOSTICS").unwrap_or(false),
        })
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_parse_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
