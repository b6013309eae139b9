//! Configuration loading for sync-server.
//!
//! Configuration is loaded from a TOML file (default: `server.toml`).

use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration for sync-server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Pairing code configuration.
    #[serde(default)]
    pub pairing: PairingConfig,
    /// Cleanup task configuration.
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server (default: 0.0.0.0:8780).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the JSON snapshot file.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Maximum encoded size of one appended entry in bytes (default: 1MB).
    #[serde(default = "default_max_entry_bytes")]
    pub max_entry_bytes: usize,
}

/// Pairing code configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PairingConfig {
    /// Pairing code lifetime in seconds (default: 60).
    #[serde(default = "default_pairing_ttl")]
    pub ttl_secs: u64,
}

/// Cleanup task configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupConfig {
    /// Sweep interval in seconds (default: 60).
    #[serde(default = "default_cleanup_interval")]
    pub interval_secs: u64,
    /// Enable the sweep task (default: true).
    #[serde(default = "default_cleanup_enabled")]
    pub enabled: bool,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0:8780".to_string()
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("shiori-sync.json")
}

fn default_max_entry_bytes() -> usize {
    1024 * 1024 // 1MB
}

fn default_pairing_ttl() -> u64 {
    60
}

fn default_cleanup_interval() -> u64 {
    60
}

fn default_cleanup_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            max_entry_bytes: default_max_entry_bytes(),
        }
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_pairing_ttl(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_cleanup_interval(),
            enabled: default_cleanup_enabled(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            pairing: PairingConfig::default(),
            cleanup: CleanupConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:8780");
        assert_eq!(config.storage.max_entry_bytes, 1024 * 1024);
        assert_eq!(config.pairing.ttl_secs, 60);
        assert!(config.cleanup.enabled);
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[server]
bind_address = "127.0.0.1:9000"

[storage]
snapshot_path = "/data/sync.json"
max_entry_bytes = 2097152

[pairing]
ttl_secs = 120

[cleanup]
interval_secs = 30
enabled = false
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.storage.snapshot_path, PathBuf::from("/data/sync.json"));
        assert_eq!(config.storage.max_entry_bytes, 2097152);
        assert_eq!(config.pairing.ttl_secs, 120);
        assert_eq!(config.cleanup.interval_secs, 30);
        assert!(!config.cleanup.enabled);
    }

    #[test]
    fn config_missing_fields_use_defaults() {
        let toml = r#"
[server]
[storage]
[pairing]
[cleanup]
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.storage.snapshot_path, PathBuf::from("shiori-sync.json"));
        assert_eq!(config.cleanup.interval_secs, 60);
    }

    #[test]
    fn config_missing_sections_use_defaults() {
        let toml = r#"
[server]
bind_address = "0.0.0.0:8781"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8781");
        assert_eq!(config.storage.max_entry_bytes, 1024 * 1024);
        assert_eq!(config.pairing.ttl_secs, 60);
    }
}
