//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional file, then
//! `WARDEN__<SECTION>__<KEY>` environment variables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog::{SeedData, DEFAULT_GRANTED_BY};
use crate::error::Result;
use crate::store::{IdStrategy, StoreSettings};
use crate::telemetry::{LogFormat, LoggingConfig};

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Registry configuration
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// How ids of new records are assigned
    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// JSON or TOML dataset to start from; the built-in sample when unset
    #[serde(default)]
    pub seed_path: Option<PathBuf>,

    /// Actor recorded on grants that do not name one
    #[serde(default = "default_granted_by")]
    pub default_granted_by: String,

    /// Number of grants listed as recent activity
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            seed_path: None,
            default_granted_by: default_granted_by(),
            recent_activity_limit: default_recent_activity_limit(),
        }
    }
}

impl RegistryConfig {
    /// Load the configured dataset.
    pub fn load_seed(&self) -> Result<SeedData> {
        match &self.seed_path {
            Some(path) => SeedData::from_path(path),
            None => Ok(SeedData::builtin()),
        }
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            id_strategy: self.id_strategy,
            default_granted_by: self.default_granted_by.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Per-module log levels
    #[serde(default)]
    pub module_levels: HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            module_levels: HashMap::new(),
        }
    }
}

impl ObservabilityConfig {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            module_levels: self.module_levels.clone(),
            ..LoggingConfig::default()
        }
    }
}

// Default value functions
fn default_granted_by() -> String { DEFAULT_GRANTED_BY.to_string() }
fn default_recent_activity_limit() -> usize { 5 }
fn default_log_level() -> String { "info".to_string() }

const ENV_PREFIX: &str = "WARDEN";

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(environment())
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Load from a specific file path, with the environment layered on top.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.registry.id_strategy, IdStrategy::Sequential);
        assert_eq!(config.registry.default_granted_by, "admin@company.com");
        assert_eq!(config.registry.recent_activity_limit, 5);
        assert!(config.registry.seed_path.is_none());
        assert_eq!(config.observability.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[registry]
id_strategy = "uuid"
default_granted_by = "it@company.com"
recent_activity_limit = 3

[observability]
log_level = "debug"
log_format = "json"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.registry.id_strategy, IdStrategy::Uuid);
        assert_eq!(config.registry.default_granted_by, "it@company.com");
        assert_eq!(config.registry.recent_activity_limit, 3);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.logging().level, "debug");
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ConfigurationError);
    }

    #[test]
    fn test_store_settings_follow_registry_config() {
        let registry = RegistryConfig {
            default_granted_by: "ops@company.com".into(),
            ..RegistryConfig::default()
        };
        let settings = registry.store_settings();
        assert_eq!(settings.default_granted_by, "ops@company.com");
        assert_eq!(settings.id_strategy, IdStrategy::Sequential);
    }

    #[test]
    fn test_builtin_seed_when_no_path() {
        let seed = RegistryConfig::default().load_seed().unwrap();
        assert_eq!(seed.users.len(), 4);
    }
}
