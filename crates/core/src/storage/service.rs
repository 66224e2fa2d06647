//! Presentation persistence using Apache OpenDAL.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::error::StorageError;
use super::key;
use super::resolver::{RemoteTarget, StorageResolver};
use crate::document::DocumentError;

/// Message returned when the caller references no loaded document.
pub const NO_DOCUMENT_MESSAGE: &str =
    "No presentation is currently loaded or the specified ID is invalid";

/// A document that can be persisted.
pub trait Document {
    /// Serialize the document into a single buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    fn encode(&self) -> Result<Bytes, DocumentError>;

    /// MIME type recorded on the stored object.
    fn content_type(&self) -> &'static str;

    /// Canonical file extension, including the leading dot.
    fn extension(&self) -> &'static str;
}

/// Addressing for an uploaded presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteObject {
    /// Bucket the object was written to.
    pub bucket: String,
    /// Full object key.
    pub key: String,
    /// Stored filename, extension included.
    pub filename: String,
    /// `s3://bucket/key`.
    pub s3_url: String,
    /// Virtual-hosted-style HTTPS URL.
    pub https_url: String,
    /// Time-limited download URL, when the store could sign one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presigned_url: Option<String>,
    /// Lifetime of `presigned_url`, e.g. `"1 hour"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presigned_url_expires: Option<String>,
}

/// Where a presentation ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "storage_type", rename_all = "snake_case")]
pub enum PersistOutcome {
    /// Uploaded to the bucket.
    S3(RemoteObject),
    /// Written to the local filesystem.
    Local {
        /// Path actually written.
        file_path: String,
    },
}

impl PersistOutcome {
    /// Human-readable summary for callers.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::S3(object) => match (&object.presigned_url, &object.presigned_url_expires) {
                (Some(url), Some(expires)) => format!(
                    "Presentation saved to S3: {}\n\nTemporary download URL (expires in {expires}):\n{url}",
                    object.s3_url
                ),
                _ => format!("Presentation saved to S3: {}", object.s3_url),
            },
            Self::Local { file_path } => format!("Presentation saved to {file_path}"),
        }
    }
}

/// Persists documents to the destination fixed by the resolver.
#[derive(Debug, Clone)]
pub struct PersistenceService {
    resolver: Arc<StorageResolver>,
}

impl PersistenceService {
    /// Create a service over a shared resolver.
    #[must_use]
    pub fn new(resolver: Arc<StorageResolver>) -> Self {
        Self { resolver }
    }

    /// The resolver this service dispatches on.
    #[must_use]
    pub fn resolver(&self) -> &StorageResolver {
        &self.resolver
    }

    /// Persist `document` under `requested_name`.
    ///
    /// In S3 mode only the base filename of `requested_name` is kept and the
    /// canonical extension is appended if missing. In local mode the name is
    /// used as a path verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when `document` is `None`,
    /// [`StorageError::InvalidInput`] for a blank name, and a
    /// document, transport or local I/O error when persistence fails.
    pub async fn persist<D>(
        &self,
        document: Option<&D>,
        requested_name: &str,
    ) -> Result<PersistOutcome, StorageError>
    where
        D: Document + ?Sized,
    {
        let document = document.ok_or_else(|| StorageError::not_found(NO_DOCUMENT_MESSAGE))?;

        if requested_name.trim().is_empty() {
            return Err(StorageError::invalid_input("file_path must not be empty"));
        }

        match self.resolver.target() {
            Some(target) => Self::upload(target, document, requested_name).await,
            None => Self::write_local(document, requested_name).await,
        }
    }

    async fn upload<D>(
        target: &RemoteTarget,
        document: &D,
        requested_name: &str,
    ) -> Result<PersistOutcome, StorageError>
    where
        D: Document + ?Sized,
    {
        let base = key::base_filename(requested_name).ok_or_else(|| {
            StorageError::invalid_input(format!("'{requested_name}' has no file name"))
        })?;
        let filename = key::ensure_extension(base, document.extension());

        let data = document.encode()?;
        let object_key = target.object_key(&filename);
        let size = data.len();

        if let Err(e) = target
            .upload(&object_key, data, document.content_type())
            .await
        {
            error!(bucket = %target.bucket(), key = %object_key, error = %e, "S3 upload failed");
            return Err(e);
        }

        info!(
            bucket = %target.bucket(),
            key = %object_key,
            size,
            "Presentation uploaded"
        );

        let (presigned_url, presigned_url_expires) = match target.presign_read(&object_key).await {
            Ok(url) => (Some(url), Some(humanize_ttl(target.presign_ttl()))),
            Err(e) => {
                warn!(key = %object_key, error = %e, "Could not generate presigned URL");
                (None, None)
            }
        };

        Ok(PersistOutcome::S3(RemoteObject {
            bucket: target.bucket().to_string(),
            s3_url: target.s3_url(&object_key),
            https_url: target.https_url(&object_key),
            key: object_key,
            filename,
            presigned_url,
            presigned_url_expires,
        }))
    }

    async fn write_local<D>(document: &D, path: &str) -> Result<PersistOutcome, StorageError>
    where
        D: Document + ?Sized,
    {
        let data = document.encode()?;

        if let Err(e) = tokio::fs::write(path, &data).await {
            error!(path, error = %e, "Local save failed");
            return Err(StorageError::LocalIo(format!(
                "Failed to save presentation to {path}: {e}"
            )));
        }

        debug!(path, size = data.len(), "Presentation saved locally");

        Ok(PersistOutcome::Local {
            file_path: path.to_string(),
        })
    }
}

/// Render a TTL the way callers read it: `"1 hour"`, `"15 minutes"`.
fn humanize_ttl(ttl: Duration) -> String {
    let secs = ttl.as_secs();
    let (value, unit) = if secs > 0 && secs % 3600 == 0 {
        (secs / 3600, "hour")
    } else if secs > 0 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };

    if value == 1 {
        format!("1 {unit}")
    } else {
        format!("{value} {unit}s")
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Whole-hour TTLs always render in hours.
    proptest! {
        #[test]
        fn prop_hour_ttl_renders_hours(hours in 1u64..48) {
            let rendered = humanize_ttl(Duration::from_secs(hours * 3600));
            prop_assert!(rendered.starts_with(&hours.to_string()));
            prop_assert!(rendered.contains("hour"));
        }
    }
}
