mod config;
mod db;
mod routes;
mod services;
mod state;

use services::catalog::Catalog;
use services::project::ProjectService;

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    // A missing .env file is normal in production.
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, ".env could not be loaded");
        }
    }

    let config = config::SiteConfig::from_env().expect("invalid configuration");
    let catalog = Catalog::builtin().expect("built-in project catalog is malformed");

    let store = db::project_store(&config).await;

    tracing::info!(
        smtp = config.mail.smtp.is_some(),
        resend = config.mail.resend.is_some(),
        uploads_dir = %config.uploads_dir.display(),
        public_dir = %config.public_dir.display(),
        "mail and storage configured"
    );

    let state = state::AppState::new(&config, ProjectService::new(store, catalog));
    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "lny-site listening");
    axum::serve(listener, app).await.expect("server failed");
}
