//! Storage destination selection and presentation persistence.
//!
//! The destination is resolved once at startup from [`StorageConfig`]:
//! either a local filesystem path supplied per call, or an S3 bucket reached
//! through Apache OpenDAL.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   persist(doc, name)   ┌────────────────────┐
//! │  PersistenceService  │ ─────────────────────► │  StorageResolver   │
//! └──────────┬───────────┘                        │  (mode fixed once) │
//!            │                                    └────────────────────┘
//!      ┌─────┴──────────────────────┐
//!      ▼                            ▼
//! local: write bytes to path   s3: op.write_with(key, bytes)
//!                                   op.presign_read(key, ttl)  (best effort)
//! ```

mod config;
mod error;
mod key;
mod resolver;
mod service;

pub use config::{Credentials, StorageConfig, StorageMode};
pub use error::StorageError;
pub use key::{base_filename, ensure_extension, https_url, normalize_prefix, object_key, s3_url};
pub use resolver::{RemoteTarget, StorageDescription, StorageResolver};
pub use service::{
    Document, NO_DOCUMENT_MESSAGE, PersistOutcome, PersistenceService, RemoteObject,
};
