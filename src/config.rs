//! Tool configuration
//!
//! Loaded from TOML; every field has a built-in default so a missing file or a
//! partial file both work.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{EtlError, EtlResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    pub database: DatabaseConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

/// Stats source connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    /// Courtesy delay before each request is drawn from [min, max] seconds
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            min_delay_secs: DEFAULT_MIN_DELAY_SECS,
            max_delay_secs: DEFAULT_MAX_DELAY_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl EtlConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> EtlResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| EtlError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> EtlResult<Self> {
        let config: EtlConfig = toml::from_str(content).map_err(|e| EtlError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Explicit file if given, else `hoopsync.toml` if present, else defaults
    pub fn resolve(explicit: Option<&Path>) -> EtlResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    fn validate(&self, path: &Path) -> EtlResult<()> {
        if self.source.min_delay_secs > self.source.max_delay_secs {
            return Err(EtlError::Config {
                path: path.to_path_buf(),
                message: format!(
                    "min_delay_secs ({}) exceeds max_delay_secs ({})",
                    self.source.min_delay_secs, self.source.max_delay_secs
                ),
            });
        }
        if self.source.base_url.trim().is_empty() {
            return Err(EtlError::Config {
                path: path.to_path_buf(),
                message: "source.base_url is empty".to_string(),
            });
        }
        Ok(())
    }
}
