//! Core presentation and storage logic for Deckstore.
//!
//! This crate has no web dependencies. The tool layer in `deckstore-api`
//! drives everything through the types exported here.
//!
//! # Modules
//!
//! - `document` - In-memory `.pptx` packages and core properties
//! - `session` - Registry of open presentations
//! - `storage` - Storage mode resolution, S3 upload and local save
//! - `template` - Template file lookup

pub mod document;
pub mod session;
pub mod storage;
pub mod template;
