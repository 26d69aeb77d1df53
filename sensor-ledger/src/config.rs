use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::query::{ScanRange, DEFAULT_MAX_SEQUENCE};
use crate::sequence::{KeyScheme, DEFAULT_KEY_PREFIX};
use crate::validation::DEFAULT_TOLERANCE;

/// Main configuration for the sensor ledger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Prefix of every sequence key (`TEMP` gives `TEMP0`, `TEMP1`, ...)
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// LMDB map size in megabytes
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_map_size_mb() -> usize {
    64
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            map_size_mb: default_map_size_mb(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Largest accepted change from the previous reading
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Exclusive upper sequence bound of the full-ledger scan
    #[serde(default = "default_max_sequence")]
    pub max_sequence: u64,
}

fn default_max_sequence() -> u64 {
    DEFAULT_MAX_SEQUENCE
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_sequence: default_max_sequence(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load config from a file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if Self::exists(path) {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn key_scheme(&self) -> KeyScheme {
        KeyScheme::new(self.ledger.key_prefix.clone())
    }

    /// Range covered by a full-ledger scan
    pub fn scan_range(&self) -> ScanRange {
        ScanRange::for_scheme(&self.key_scheme(), self.query.max_sequence)
    }

    pub fn map_size_bytes(&self) -> usize {
        self.ledger.map_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Get the default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sensor-ledger")
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

/// Get the ledger database path from config file path
pub fn ledger_db_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or(config_path)
        .join("ledger")
}
