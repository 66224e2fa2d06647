//! Storage configuration types.

use std::fmt;

use serde::Serialize;

use deckstore_shared::StorageSettings;

/// Where presentations are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Uploaded to an S3 bucket.
    S3,
    /// Written to the local filesystem.
    Local,
}

impl StorageMode {
    /// Mode name reported to callers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Local => "local",
        }
    }
}

/// S3 access credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// AWS access key ID.
    pub access_key_id: String,
    /// AWS secret access key.
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Storage configuration, immutable once the resolver is built.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Whether remote (S3) mode is requested.
    pub enabled: bool,
    /// Bucket name, required when `enabled`.
    pub bucket: Option<String>,
    /// Key prefix; trailing separators are dropped when building keys.
    pub prefix: String,
    /// Bucket region.
    pub region: String,
    /// Endpoint override for S3-compatible stores.
    pub endpoint: Option<String>,
    /// Access credentials, required when `enabled`.
    pub credentials: Option<Credentials>,
    /// Presigned download URL TTL in seconds.
    pub presign_ttl_secs: u64,
}

impl StorageConfig {
    /// Default key prefix.
    pub const DEFAULT_PREFIX: &'static str = "presentations/";
    /// Default region.
    pub const DEFAULT_REGION: &'static str = "us-east-1";
    /// Default presigned URL TTL: 1 hour.
    pub const DEFAULT_PRESIGN_TTL: u64 = 3600;

    /// Local filesystem mode.
    #[must_use]
    pub fn local() -> Self {
        Self {
            enabled: false,
            bucket: None,
            prefix: Self::DEFAULT_PREFIX.to_string(),
            region: Self::DEFAULT_REGION.to_string(),
            endpoint: None,
            credentials: None,
            presign_ttl_secs: Self::DEFAULT_PRESIGN_TTL,
        }
    }

    /// S3 mode for `bucket` with static credentials.
    #[must_use]
    pub fn s3(
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            enabled: true,
            bucket: Some(bucket.into()),
            credentials: Some(Credentials {
                access_key_id: access_key_id.into(),
                secret_access_key: secret_access_key.into(),
            }),
            ..Self::local()
        }
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set a custom endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the presigned URL TTL.
    #[must_use]
    pub fn with_presign_ttl(mut self, secs: u64) -> Self {
        self.presign_ttl_secs = secs;
        self
    }
}

impl From<StorageSettings> for StorageConfig {
    fn from(settings: StorageSettings) -> Self {
        let credentials = match (settings.access_key_id, settings.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(Credentials {
                access_key_id,
                secret_access_key,
            }),
            _ => None,
        };

        Self {
            enabled: settings.enabled,
            bucket: settings.bucket,
            prefix: settings.prefix,
            region: settings.region,
            endpoint: settings.endpoint,
            credentials,
            presign_ttl_secs: settings.presign_ttl_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_defaults() {
        let config = StorageConfig::local();
        assert!(!config.enabled);
        assert_eq!(config.prefix, "presentations/");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.presign_ttl_secs, 3600);
    }

    #[test]
    fn test_s3_builder() {
        let config = StorageConfig::s3("demo-bucket", "AKID", "secret")
            .with_prefix("decks/")
            .with_region("eu-central-1")
            .with_endpoint("http://localhost:9000")
            .with_presign_ttl(900);

        assert!(config.enabled);
        assert_eq!(config.bucket.as_deref(), Some("demo-bucket"));
        assert_eq!(config.prefix, "decks/");
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.presign_ttl_secs, 900);
    }

    #[test]
    fn test_from_settings_requires_both_keys() {
        let settings = StorageSettings {
            enabled: true,
            bucket: Some("b".to_string()),
            access_key_id: Some("AKID".to_string()),
            ..StorageSettings::default()
        };
        assert!(StorageConfig::from(settings).credentials.is_none());

        let settings = StorageSettings {
            access_key_id: Some("AKID".to_string()),
            secret_access_key: Some("secret".to_string()),
            ..StorageSettings::default()
        };
        assert!(StorageConfig::from(settings).credentials.is_some());
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let config = StorageConfig::s3("b", "AKID", "top-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("top-secret"));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(StorageMode::S3.as_str(), "s3");
        assert_eq!(StorageMode::Local.as_str(), "local");
    }
}
