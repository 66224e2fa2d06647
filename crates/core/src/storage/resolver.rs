//! Storage mode resolution.

use std::time::Duration;

use bytes::Bytes;
use opendal::{Operator, services};
use serde::Serialize;
use tracing::info;

use super::config::{StorageConfig, StorageMode};
use super::error::StorageError;
use super::key;

/// Resolved S3 destination.
#[derive(Debug, Clone)]
pub struct RemoteTarget {
    operator: Operator,
    bucket: String,
    prefix: String,
    region: String,
    presign_ttl: Duration,
}

impl RemoteTarget {
    /// Wrap an already-built operator for `bucket`.
    ///
    /// The operator must be rooted at the bucket, so object keys are used as
    /// paths unchanged.
    #[must_use]
    pub fn new(
        operator: Operator,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        region: impl Into<String>,
        presign_ttl: Duration,
    ) -> Self {
        Self {
            operator,
            bucket: bucket.into(),
            prefix: prefix.into(),
            region: region.into(),
            presign_ttl,
        }
    }

    /// Bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Configured key prefix, as given.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Bucket region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Lifetime of presigned download URLs.
    #[must_use]
    pub fn presign_ttl(&self) -> Duration {
        self.presign_ttl
    }

    /// Object key for `filename` under the configured prefix.
    #[must_use]
    pub fn object_key(&self, filename: &str) -> String {
        key::object_key(&self.prefix, filename)
    }

    /// Canonical `s3://` URI of `key`.
    #[must_use]
    pub fn s3_url(&self, key: &str) -> String {
        key::s3_url(&self.bucket, key)
    }

    /// HTTPS URL of `key`.
    #[must_use]
    pub fn https_url(&self, key: &str) -> String {
        key::https_url(&self.bucket, &self.region, key)
    }

    /// Write `data` as a single object.
    pub async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.operator
            .write_with(key, data)
            .content_type(content_type)
            .await?;
        Ok(())
    }

    /// Presigned GET URL for `key`.
    pub async fn presign_read(&self, key: &str) -> Result<String, StorageError> {
        let presigned = self.operator.presign_read(key, self.presign_ttl).await?;
        Ok(presigned.uri().to_string())
    }
}

/// Storage destination fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct StorageResolver {
    remote: Option<RemoteTarget>,
}

/// Read-only view of the resolved storage destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageDescription {
    /// Active mode.
    pub storage_mode: StorageMode,
    /// Bucket, S3 mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_bucket: Option<String>,
    /// Key prefix, S3 mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_prefix: Option<String>,
    /// Region, S3 mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_region: Option<String>,
}

impl StorageResolver {
    /// Resolve the storage destination from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] when remote mode is enabled
    /// without a bucket, credentials or a non-empty key prefix, or when the
    /// S3 client cannot be built. Remote mode never falls back to local.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        if !config.enabled {
            info!("S3 support disabled, presentations are saved locally");
            return Ok(Self::local());
        }

        let bucket = config
            .bucket
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| {
                StorageError::configuration("S3_ENABLED is true but S3_BUCKET_NAME is not set")
            })?;

        let credentials = config.credentials.ok_or_else(|| {
            StorageError::configuration(
                "AWS credentials not configured properly (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY)",
            )
        })?;

        if key::normalize_prefix(&config.prefix).is_empty() {
            return Err(StorageError::configuration(format!(
                "S3 key prefix '{}' is empty once trailing '/' are removed",
                config.prefix
            )));
        }

        let mut builder = services::S3::default()
            .bucket(&bucket)
            .region(&config.region)
            .access_key_id(&credentials.access_key_id)
            .secret_access_key(&credentials.secret_access_key);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint(endpoint);
        }

        let operator = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        info!(
            bucket = %bucket,
            prefix = %config.prefix,
            region = %config.region,
            "S3 handler initialized"
        );

        Ok(Self::remote(RemoteTarget::new(
            operator,
            bucket,
            config.prefix,
            config.region,
            Duration::from_secs(config.presign_ttl_secs),
        )))
    }

    /// Local filesystem mode.
    #[must_use]
    pub fn local() -> Self {
        Self { remote: None }
    }

    /// Remote mode with an explicit target.
    #[must_use]
    pub fn remote(target: RemoteTarget) -> Self {
        Self {
            remote: Some(target),
        }
    }

    /// Resolved mode.
    #[must_use]
    pub fn mode(&self) -> StorageMode {
        if self.remote.is_some() {
            StorageMode::S3
        } else {
            StorageMode::Local
        }
    }

    /// Remote target, `None` in local mode.
    #[must_use]
    pub fn target(&self) -> Option<&RemoteTarget> {
        self.remote.as_ref()
    }

    /// Bucket name, S3 mode only.
    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        self.remote.as_ref().map(RemoteTarget::bucket)
    }

    /// Key prefix, S3 mode only.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.remote.as_ref().map(RemoteTarget::prefix)
    }

    /// Region, S3 mode only.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.remote.as_ref().map(RemoteTarget::region)
    }

    /// Describe where presentations will land.
    #[must_use]
    pub fn describe(&self) -> StorageDescription {
        StorageDescription {
            storage_mode: self.mode(),
            s3_bucket: self.bucket().map(str::to_string),
            s3_prefix: self.prefix().map(str::to_string),
            s3_region: self.region().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_resolves_local() {
        let resolver = StorageResolver::from_config(StorageConfig::local()).expect("local mode");
        assert_eq!(resolver.mode(), StorageMode::Local);
        assert!(resolver.target().is_none());
        assert_eq!(resolver.bucket(), None);
        assert_eq!(resolver.region(), None);
    }

    #[test]
    fn test_disabled_ignores_partial_settings() {
        let config = StorageConfig {
            bucket: Some("ignored".to_string()),
            ..StorageConfig::local()
        };
        let resolver = StorageResolver::from_config(config).expect("local mode");
        assert_eq!(resolver.mode(), StorageMode::Local);
    }

    #[test]
    fn test_enabled_without_bucket_is_configuration_error() {
        let config = StorageConfig {
            bucket: None,
            ..StorageConfig::s3("unused", "AKID", "secret")
        };
        let err = StorageResolver::from_config(config).expect_err("missing bucket");
        assert!(matches!(err, StorageError::Configuration(_)));
        assert!(err.to_string().contains("S3_BUCKET_NAME"));
    }

    #[test]
    fn test_enabled_with_blank_bucket_is_configuration_error() {
        let config = StorageConfig {
            bucket: Some("   ".to_string()),
            ..StorageConfig::s3("unused", "AKID", "secret")
        };
        let err = StorageResolver::from_config(config).expect_err("blank bucket");
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_enabled_without_credentials_is_configuration_error() {
        let config = StorageConfig {
            credentials: None,
            ..StorageConfig::s3("demo-bucket", "AKID", "secret")
        };
        let err = StorageResolver::from_config(config).expect_err("missing credentials");
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[rstest::rstest]
    #[case("")]
    #[case("/")]
    #[case("///")]
    fn test_enabled_with_empty_prefix_is_configuration_error(#[case] prefix: &str) {
        let config = StorageConfig::s3("demo-bucket", "AKID", "secret").with_prefix(prefix);
        let err = StorageResolver::from_config(config).expect_err("empty prefix");
        assert!(matches!(err, StorageError::Configuration(_)));
        assert!(err.to_string().contains("prefix"));
    }

    #[tokio::test]
    async fn test_s3_presign_read_signs_offline() {
        let config = StorageConfig::s3("demo-bucket", "AKID", "secret");
        let resolver = StorageResolver::from_config(config).expect("s3 mode");
        let target = resolver.target().expect("remote target");

        let url = target
            .presign_read("presentations/report.pptx")
            .await
            .expect("s3 signs without a network call");

        assert!(url.starts_with("https://"));
        assert!(url.contains("demo-bucket"));
        assert!(url.contains("presentations/report.pptx"));
        assert!(url.contains("X-Amz-Expires=3600"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[test]
    fn test_enabled_resolves_s3() {
        let config = StorageConfig::s3("demo-bucket", "AKID", "secret")
            .with_prefix("decks/")
            .with_region("eu-west-1");
        let resolver = StorageResolver::from_config(config).expect("s3 mode");

        assert_eq!(resolver.mode(), StorageMode::S3);
        assert_eq!(resolver.bucket(), Some("demo-bucket"));
        assert_eq!(resolver.prefix(), Some("decks/"));
        assert_eq!(resolver.region(), Some("eu-west-1"));

        let target = resolver.target().expect("remote target");
        assert_eq!(target.presign_ttl(), Duration::from_secs(3600));
        assert_eq!(target.object_key("q3.pptx"), "decks/q3.pptx");
    }

    #[test]
    fn test_describe_local_omits_bucket_fields() {
        let description = StorageResolver::local().describe();
        assert_eq!(description.storage_mode, StorageMode::Local);

        let json = serde_json::to_value(&description).expect("serializable");
        assert_eq!(json, serde_json::json!({ "storage_mode": "local" }));
    }

    #[test]
    fn test_describe_s3() {
        let config = StorageConfig::s3("demo-bucket", "AKID", "secret");
        let description = StorageResolver::from_config(config)
            .expect("s3 mode")
            .describe();

        let json = serde_json::to_value(&description).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({
                "storage_mode": "s3",
                "s3_bucket": "demo-bucket",
                "s3_prefix": "presentations/",
                "s3_region": "us-east-1",
            })
        );
    }
}
