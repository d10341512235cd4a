//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `PLACEMENT__DATABASE__URL`
pub const ENV_PREFIX: &str = "PLACEMENT";

/// Main application configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when unset
    pub directory: Option<String>,
    pub file_prefix: String,
    pub json: bool,
}

/// Persistence behaviour
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Isolation level for organization writes that replace the contact set.
    ///
    /// These writes lock the organization row first. Under `read_committed` a
    /// second writer waits for the lock and then applies its own update, so
    /// the last writer wins. Stricter levels abort the waiting writer with a
    /// serialization failure, which surfaces as an internal error.
    pub replace_isolation: IsolationLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub fn set_transaction_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "SET TRANSACTION ISOLATION LEVEL READ COMMITTED",
            IsolationLevel::RepeatableRead => "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ",
            IsolationLevel::Serializable => "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE",
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/placement".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "placement-registry.log".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` (optional) and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(config::File::with_name("config").required(false))
    }

    /// Load settings from a specific file, still honouring environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::load(config::File::from(path.as_ref()))
    }

    fn load<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::RegistryError> {
        super::validation::validate_settings(self)
    }

    /// Render as TOML, e.g. to seed a `config.toml`
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
