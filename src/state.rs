//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! built once at startup and never mutated afterwards, so cloning it per
//! request only bumps reference counts.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{MailConfig, SiteConfig};
use crate::services::notify::Notifier;
use crate::services::project::ProjectService;

/// Clone is required by Axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub projects: ProjectService,
    pub notifier: Notifier,
    /// Kept for the email diagnostics endpoint.
    pub mail: Arc<MailConfig>,
    pub uploads_dir: Arc<PathBuf>,
    pub public_dir: Arc<PathBuf>,
    pub email_diagnostics: bool,
}

impl AppState {
    #[must_use]
    pub fn new(config: &SiteConfig, projects: ProjectService) -> Self {
        Self {
            projects,
            notifier: Notifier::from_config(&config.mail),
            mail: Arc::new(config.mail.clone()),
            uploads_dir: Arc::new(config.uploads_dir.clone()),
            public_dir: Arc::new(config.public_dir.clone()),
            email_diagnostics: config.email_diagnostics,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
