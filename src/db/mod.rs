//! Optional project database.
//!
//! SYSTEM CONTEXT
//! ==============
//! Case-study pages read published rows from the `projects` table when
//! `DATABASE_URL` is set. Startup never fails on the database: a missing URL
//! or a failed connection leaves the service on the built-in catalog, and the
//! reason is logged once here.

use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::SiteConfig;
use crate::services::project::{PgProjectStore, ProjectStore};

/// Open a pool of `max_connections` and bring the `projects` schema up to
/// date.
///
/// # Errors
///
/// Returns the sqlx error if the server cannot be reached or a migration
/// fails.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new().max_connections(max_connections).connect(database_url).await?;
    sqlx::migrate!("src/db/migrations").run(&pool).await?;
    Ok(pool)
}

/// The project store for this run, or `None` when pages should come from the
/// catalog alone.
pub async fn project_store(config: &SiteConfig) -> Option<Arc<dyn ProjectStore>> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::info!("DATABASE_URL not set, serving built-in catalog only");
        return None;
    };
    match init_pool(url, config.db_max_connections).await {
        Ok(pool) => {
            tracing::info!(max_connections = config.db_max_connections, "project database connected");
            Some(Arc::new(PgProjectStore::new(pool)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "project database unavailable, serving built-in catalog only");
            None
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
