use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use internwatch_api::{DEFAULT_JOB_LIMIT, DEFAULT_TRACKER_BASE};

/// Main configuration structure
///
/// Loaded from the config file with CLI flags layered on top.
/// Priority: CLI > Env > File > Defaults (like a sensible person would do)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    /// when no file exists
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            // No config file? Use defaults
            Ok(Self::default())
        }
    }

    /// Get the config file path
    /// Uses XDG on Linux/macOS, AppData on Windows
    fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("internwatch");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Base URL of the tracker API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// How many jobs to request per sync
    #[serde(default = "default_job_limit")]
    pub job_limit: u32,
}

fn default_base_url() -> String {
    DEFAULT_TRACKER_BASE.to_string()
}

fn default_job_limit() -> u32 {
    DEFAULT_JOB_LIMIT
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            job_limit: default_job_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between scheduled sync cycles
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    // one minute keeps the board fresh without hammering the tracker
    crate::sync::SYNC_INTERVAL.as_secs()
}

impl SyncConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}
