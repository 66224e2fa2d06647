//! Shared errors and configuration for Deckstore.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error taxonomy surfaced at the tool boundary
//! - Configuration management (files, `DECKSTORE__*` and the storage variables)

pub mod config;
pub mod error;

pub use config::{AppConfig, ServerConfig, StorageSettings, TemplateSettings};
pub use error::AppError;
