//! # Replication Configuration
//!
//! Explicit, enumerated configuration for a replication manager. Cloning a
//! manager from a template copies this struct by value; there is no field-by-name
//! copying anywhere.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use replica_loader::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // File values, then REPLICA_LOADER__* environment overrides
//! let manager = ConfigManager::load_from_file("config/replication.toml")?;
//! let attribute = &manager.config().attribute_name;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

use crate::constants::DEFAULT_ATTRIBUTE_NAME;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Replication manager settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplicationConfig {
    /// Attribute key holding the module-system context
    pub attribute_name: String,

    /// Whether replication traffic is processed immediately. When `false`,
    /// processing waits until the watched attribute appears.
    pub initialized: bool,

    pub expire_sessions_on_shutdown: bool,
    pub notify_session_listeners_on_replication: bool,
    pub notify_container_listeners_on_replication: bool,

    /// Timeout for the initial session state transfer
    pub state_transfer_timeout_secs: u64,

    pub send_all_sessions: bool,
    pub send_all_sessions_size: u32,
    pub send_all_sessions_wait_time_ms: u64,

    /// Drop queued messages older than the state transfer
    pub state_timestamp_drop: bool,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            attribute_name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            initialized: true,
            expire_sessions_on_shutdown: false,
            notify_session_listeners_on_replication: true,
            notify_container_listeners_on_replication: true,
            state_transfer_timeout_secs: 60,
            send_all_sessions: true,
            send_all_sessions_size: 1000,
            send_all_sessions_wait_time_ms: 2000,
            state_timestamp_drop: true,
        }
    }
}

impl ReplicationConfig {
    /// Builder-style override of the watched attribute
    pub fn with_attribute_name(mut self, attribute_name: impl Into<String>) -> Self {
        self.attribute_name = attribute_name.into();
        self
    }

    /// Builder-style override of the initial processing state
    pub fn with_initialized(mut self, initialized: bool) -> Self {
        self.initialized = initialized;
        self
    }

    pub fn state_transfer_timeout(&self) -> Duration {
        Duration::from_secs(self.state_transfer_timeout_secs)
    }

    pub fn send_all_sessions_wait_time(&self) -> Duration {
        Duration::from_millis(self.send_all_sessions_wait_time_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.attribute_name.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "attribute_name",
                "replication configuration",
            ));
        }

        if self.state_transfer_timeout_secs == 0 {
            return Err(ConfigurationError::invalid_value(
                "state_transfer_timeout_secs",
                "0",
                "state transfer timeout must be greater than 0",
            ));
        }

        if self.send_all_sessions_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "send_all_sessions_size",
                "0",
                "batch size must be greater than 0",
            ));
        }

        Ok(())
    }
}
