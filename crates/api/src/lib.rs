//! HTTP tool surface with Axum routes.
//!
//! This crate provides:
//! - The tool catalog and dispatcher
//! - REST routes to list and invoke tools
//! - Flat JSON result shapes

pub mod routes;
pub mod tools;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use deckstore_core::session::PresentationRegistry;
use deckstore_core::storage::{PersistenceService, StorageError, StorageResolver};
use deckstore_core::template::TemplateLocator;
use deckstore_shared::AppError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Open presentations.
    pub registry: PresentationRegistry,
    /// Persistence service, or the configuration error that prevented it.
    pub storage: Result<Arc<PersistenceService>, String>,
    /// Template lookup.
    pub templates: Arc<TemplateLocator>,
}

impl AppState {
    /// Build state from a resolved (or failed) storage destination.
    ///
    /// A failed resolver does not prevent startup; storage tools report the
    /// configuration error instead.
    #[must_use]
    pub fn new(
        storage: Result<StorageResolver, StorageError>,
        templates: TemplateLocator,
    ) -> Self {
        Self {
            registry: PresentationRegistry::new(),
            storage: storage
                .map(|resolver| Arc::new(PersistenceService::new(Arc::new(resolver))))
                .map_err(|e| e.to_string()),
            templates: Arc::new(templates),
        }
    }

    /// The persistence service.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] when storage failed to initialize.
    pub fn persistence(&self) -> Result<&PersistenceService, AppError> {
        self.storage
            .as_deref()
            .map_err(|msg| AppError::Configuration(msg.clone()))
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
