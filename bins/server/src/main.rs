//! Deckstore Server
//!
//! Main entry point for the presentation tool service.

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deckstore_api::{AppState, create_router};
use deckstore_core::storage::{StorageConfig, StorageResolver};
use deckstore_core::template::TemplateLocator;
use deckstore_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deckstore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Resolve the storage destination once; a bad S3 setup is reported by the
    // storage tools instead of stopping the server.
    let storage = StorageResolver::from_config(StorageConfig::from(config.storage));
    match &storage {
        Ok(resolver) => info!(mode = resolver.mode().as_str(), "Storage resolved"),
        Err(e) => error!(error = %e, "Storage configuration invalid, saving is disabled"),
    }

    let templates = TemplateLocator::new(config.templates.search_dirs);
    info!(search_dirs = ?templates.search_dirs(), "Template search path configured");

    // Create application state
    let state = AppState::new(storage, templates);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
