//! Application configuration management.

use std::path::PathBuf;

use config::{ConfigBuilder, ConfigError, builder::DefaultState};
use serde::Deserialize;

/// Environment variables read for storage settings, keyed by config path.
///
/// `S3_ENABLED` is handled separately because only a case-insensitive
/// `"true"` enables remote mode.
const STORAGE_ENV_VARS: [(&str, &str); 7] = [
    ("S3_BUCKET_NAME", "storage.bucket"),
    ("S3_PREFIX", "storage.prefix"),
    ("AWS_DEFAULT_REGION", "storage.region"),
    ("S3_ENDPOINT", "storage.endpoint"),
    ("AWS_ACCESS_KEY_ID", "storage.access_key_id"),
    ("AWS_SECRET_ACCESS_KEY", "storage.secret_access_key"),
    ("S3_PRESIGN_TTL_SECS", "storage.presign_ttl_secs"),
];

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage destination configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Template lookup configuration.
    #[serde(default)]
    pub templates: TemplateSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Storage destination settings.
///
/// Read once at startup; a changed environment needs a restart.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Whether presentations are uploaded to S3 instead of written locally.
    #[serde(default)]
    pub enabled: bool,
    /// Target bucket, required when `enabled`.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Key prefix for uploaded presentations.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Bucket region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key ID.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Presigned download URL lifetime in seconds.
    #[serde(default = "default_presign_ttl")]
    pub presign_ttl_secs: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            bucket: None,
            prefix: default_prefix(),
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            presign_ttl_secs: default_presign_ttl(),
        }
    }
}

fn default_prefix() -> String {
    "presentations/".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_presign_ttl() -> u64 {
    3600 // 1 hour
}

/// Template lookup settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateSettings {
    /// Directories searched when a template path does not exist as given.
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// `DECKSTORE__*` variables, then the storage variables (`S3_ENABLED`,
    /// `S3_BUCKET_NAME`, `AWS_DEFAULT_REGION`, ...). `PPT_TEMPLATE_PATH`
    /// directories are searched before any configured ones.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DECKSTORE").separator("__"));

        let mut config: Self = with_storage_env(builder)?.build()?.try_deserialize()?;

        if let Some(paths) = std::env::var_os("PPT_TEMPLATE_PATH") {
            let mut dirs: Vec<PathBuf> = std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            dirs.append(&mut config.templates.search_dirs);
            config.templates.search_dirs = dirs;
        }

        Ok(config)
    }
}

fn with_storage_env(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Ok(flag) = std::env::var("S3_ENABLED") {
        builder = builder.set_override("storage.enabled", flag.trim().eq_ignore_ascii_case("true"))?;
    }

    for (var, key) in STORAGE_ENV_VARS {
        let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
        builder = builder.set_override_option(key, value)?;
    }

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORAGE_VARS: [&str; 9] = [
        "S3_ENABLED",
        "S3_BUCKET_NAME",
        "S3_PREFIX",
        "AWS_DEFAULT_REGION",
        "S3_ENDPOINT",
        "AWS_ACCESS_KEY_ID",
        "AWS_SECRET_ACCESS_KEY",
        "S3_PRESIGN_TTL_SECS",
        "PPT_TEMPLATE_PATH",
    ];

    fn env_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        STORAGE_VARS
            .iter()
            .map(|var| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == var)
                    .map(|(_, value)| (*value).to_string());
                (*var, value)
            })
            .collect()
    }

    #[test]
    fn test_storage_defaults_without_env() {
        temp_env::with_vars(env_with(&[]), || {
            let config = AppConfig::load().expect("config should load");
            assert!(!config.storage.enabled);
            assert_eq!(config.storage.bucket, None);
            assert_eq!(config.storage.prefix, "presentations/");
            assert_eq!(config.storage.region, "us-east-1");
            assert_eq!(config.storage.presign_ttl_secs, 3600);
            assert!(config.templates.search_dirs.is_empty());
        });
    }

    #[test]
    fn test_storage_env_vars_are_applied() {
        let vars = env_with(&[
            ("S3_ENABLED", "TRUE"),
            ("S3_BUCKET_NAME", "demo-bucket"),
            ("S3_PREFIX", "decks/"),
            ("AWS_DEFAULT_REGION", "eu-west-1"),
            ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("S3_PRESIGN_TTL_SECS", "600"),
        ]);

        temp_env::with_vars(vars, || {
            let config = AppConfig::load().expect("config should load");
            assert!(config.storage.enabled);
            assert_eq!(config.storage.bucket.as_deref(), Some("demo-bucket"));
            assert_eq!(config.storage.prefix, "decks/");
            assert_eq!(config.storage.region, "eu-west-1");
            assert_eq!(config.storage.access_key_id.as_deref(), Some("AKIDEXAMPLE"));
            assert_eq!(config.storage.secret_access_key.as_deref(), Some("secret"));
            assert_eq!(config.storage.presign_ttl_secs, 600);
        });
    }

    #[rstest::rstest]
    #[case("true", true)]
    #[case("True", true)]
    #[case("false", false)]
    #[case("1", false)]
    #[case("yes", false)]
    fn test_s3_enabled_only_accepts_true(#[case] raw: &str, #[case] expected: bool) {
        temp_env::with_vars(env_with(&[("S3_ENABLED", raw)]), || {
            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.storage.enabled, expected);
        });
    }

    #[test]
    fn test_blank_bucket_is_treated_as_missing() {
        let vars = env_with(&[("S3_ENABLED", "true"), ("S3_BUCKET_NAME", "  ")]);

        temp_env::with_vars(vars, || {
            let config = AppConfig::load().expect("config should load");
            assert!(config.storage.enabled);
            assert_eq!(config.storage.bucket, None);
        });
    }

    #[test]
    fn test_template_path_dirs_are_split() {
        let joined = std::env::join_paths(["/opt/templates", "/srv/decks"])
            .expect("valid paths")
            .into_string()
            .expect("utf-8 paths");

        temp_env::with_vars(env_with(&[("PPT_TEMPLATE_PATH", &joined)]), || {
            let config = AppConfig::load().expect("config should load");
            assert_eq!(
                config.templates.search_dirs,
                vec![PathBuf::from("/opt/templates"), PathBuf::from("/srv/decks")]
            );
        });
    }

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }
}
