//! Operator configuration for the supervisor
//!
//! Loaded from a TOML file (`quorumd.toml` by default) with environment
//! variable overrides, as nested per-concern settings structs with
//! per-field defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete supervisor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    #[serde(default)]
    pub replication: ReplicationSettings,

    #[serde(default)]
    pub dcs: DcsSettings,

    #[serde(default)]
    pub r#loop: LoopSettings,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            replication: ReplicationSettings::default(),
            dcs: DcsSettings::default(),
            r#loop: LoopSettings::default(),
        }
    }
}

impl SupervisorConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: SupervisorConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config, using defaults");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replication.synchronous_node_count < 1 {
            return Err(ConfigError::Invalid(
                "replication.synchronous_node_count must be >= 1".to_string(),
            ));
        }
        if self.dcs.cluster_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "dcs.cluster_prefix must not be empty".to_string(),
            ));
        }
        if self.r#loop.tick_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "loop.tick_interval_secs must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides to all settings
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(n) = std::env::var("QUORUMD_SYNCHRONOUS_NODE_COUNT") {
            if let Ok(n) = n.parse() {
                self.replication.synchronous_node_count = n;
            }
        }
        if let Ok(prefix) = std::env::var("QUORUMD_CLUSTER_PREFIX") {
            self.dcs.cluster_prefix = prefix;
        }
        if let Ok(endpoint) = std::env::var("QUORUMD_DCS_ENDPOINT") {
            self.dcs.endpoint = endpoint;
        }
        if let Ok(secs) = std::env::var("QUORUMD_TICK_INTERVAL_SECS") {
            if let Ok(secs) = secs.parse() {
                self.r#loop.tick_interval_secs = secs;
            }
        }
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.r#loop.tick_interval_secs)
    }
}

/// Desired synchronous replication factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationSettings {
    #[serde(default = "default_synchronous_node_count")]
    pub synchronous_node_count: u32,
}

impl Default for ReplicationSettings {
    fn default() -> Self {
        Self {
            synchronous_node_count: default_synchronous_node_count(),
        }
    }
}

fn default_synchronous_node_count() -> u32 {
    1
}

/// DCS connection settings. `endpoint` is kept for shape parity with a real
/// adapter even though the in-memory DCS shipped in this workspace ignores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcsSettings {
    #[serde(default = "default_cluster_prefix")]
    pub cluster_prefix: String,

    #[serde(default = "default_dcs_endpoint")]
    pub endpoint: String,
}

impl Default for DcsSettings {
    fn default() -> Self {
        Self {
            cluster_prefix: default_cluster_prefix(),
            endpoint: default_dcs_endpoint(),
        }
    }
}

fn default_cluster_prefix() -> String {
    "/service/quorumd".to_string()
}

fn default_dcs_endpoint() -> String {
    "http://127.0.0.1:2379".to_string()
}

/// HA loop tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopSettings {
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

fn default_tick_interval_secs() -> u64 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SupervisorConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_replication_factor_is_rejected() {
        let mut config = SupervisorConfig::default();
        config.replication.synchronous_node_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_from_toml() {
        let toml = r#"
            [replication]
            synchronous_node_count = 2

            [dcs]
            cluster_prefix = "/service/mycluster"
            endpoint = "http://127.0.0.1:2379"

            [loop]
            tick_interval_secs = 5
        "#;
        let config: SupervisorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.replication.synchronous_node_count, 2);
        assert_eq!(config.dcs.cluster_prefix, "/service/mycluster");
        assert_eq!(config.r#loop.tick_interval_secs, 5);
    }

    #[test]
    fn env_overrides_apply() {
        std::env::set_var("QUORUMD_SYNCHRONOUS_NODE_COUNT", "3");
        let config = SupervisorConfig::default().with_env_overrides();
        assert_eq!(config.replication.synchronous_node_count, 3);
        std::env::remove_var("QUORUMD_SYNCHRONOUS_NODE_COUNT");
    }

    #[test]
    fn loads_from_a_real_file_on_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [replication]
            synchronous_node_count = 4

            [dcs]
            cluster_prefix = "/service/fromfile"
            "#
        )
        .unwrap();

        let config = SupervisorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.replication.synchronous_node_count, 4);
        assert_eq!(config.dcs.cluster_prefix, "/service/fromfile");
    }

    #[test]
    fn a_missing_file_is_a_read_error() {
        let result = SupervisorConfig::from_file("/nonexistent/quorumd.toml");
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }
}
