use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Path of the file-backed store; embedders may ignore this and
    /// inject their own store implementation.
    pub path: Option<String>,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: None,
            namespace: default_namespace(),
        }
    }
}

fn default_namespace() -> String {
    "roomscout".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSettings {
    /// Caller-provided default city, consulted after the route city and
    /// before the remembered one.
    pub default_city: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with ROOMSCOUT_)
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development convenience)
        dotenv::dotenv().ok();

        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with ROOMSCOUT_)
            // e.g., ROOMSCOUT__BACKEND__BASE_URL -> backend.base_url
            .add_source(
                Environment::with_prefix("ROOMSCOUT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ROOMSCOUT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
