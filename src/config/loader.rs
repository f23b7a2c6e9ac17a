//! Configuration Loader
//!
//! Layers an optional configuration file (TOML, YAML or JSON, chosen by
//! extension) under environment overrides, then validates the result.

use super::error::{ConfigResult, ConfigurationError};
use super::ReplicationConfig;
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default prefix for environment overrides, e.g. `REPLICA_LOADER__INITIALIZED=false`
pub const ENV_PREFIX: &str = "REPLICA_LOADER";

/// Loaded and validated configuration
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ReplicationConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// Defaults plus environment overrides
    pub fn load() -> ConfigResult<Self> {
        Self::load_with_prefix(None, ENV_PREFIX)
    }

    /// File values plus environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load_with_prefix(Some(path.as_ref()), ENV_PREFIX)
    }

    /// Load with an explicit environment prefix.
    /// Useful for testing without touching the default variables.
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> ConfigResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigurationError::file_read_error(
                    path.display().to_string(),
                    "not a regular file",
                ));
            }
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let source_name = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("{env_prefix} environment"));

        let config: ReplicationConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigurationError::parse_error(source_name.clone(), e))?;

        config.validate()?;

        debug!(
            source = %source_name,
            config = %serde_json::to_string(&config).unwrap_or_else(|_| "[serialization error]".to_string()),
            "Replication configuration loaded"
        );

        Ok(Self {
            config,
            source: path.map(Path::to_path_buf),
        })
    }

    pub fn config(&self) -> &ReplicationConfig {
        &self.config
    }

    /// File the configuration was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn into_config(self) -> ReplicationConfig {
        self.config
    }
}
