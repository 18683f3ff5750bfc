//! Configuration handling for the wizard

use crate::storage::DEFAULT_QUOTA_BYTES;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the storage file location
pub const STORAGE_ENV: &str = "WIZARD_TUI_STORAGE";

/// User configuration. Every field is optional; accessors apply defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WizardConfig {
    /// Seconds between automatic draft saves
    pub autosave_interval_secs: Option<u64>,
    /// Delay before a field is validated after the last keystroke
    pub validation_debounce_ms: Option<u64>,
    /// Hours of inactivity after which a stored session is discarded
    pub session_ttl_hours: Option<i64>,
    /// Storage file; `None` uses the data directory
    pub storage_path: Option<PathBuf>,
    /// Maximum size of the storage file. `0` disables persistence.
    pub storage_quota_bytes: Option<usize>,
    /// Directory receiving exported registrations
    pub export_dir: Option<PathBuf>,
    /// Simulated submission round trip
    pub submission_latency_ms: Option<u64>,
    /// Number of initial submissions that fail
    pub simulated_failures: Option<u32>,
}

impl WizardConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "wizard", "wizard-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Directory for the storage file, exports and logs
    pub fn data_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: WizardConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.unwrap_or(30).max(1))
    }

    pub fn validation_debounce(&self) -> Duration {
        Duration::from_millis(self.validation_debounce_ms.unwrap_or(400))
    }

    /// Out-of-range hour counts fall back to the default
    pub fn session_ttl(&self) -> chrono::Duration {
        self.session_ttl_hours
            .and_then(chrono::Duration::try_hours)
            .unwrap_or_else(|| chrono::Duration::hours(24))
    }

    pub fn storage_quota(&self) -> usize {
        self.storage_quota_bytes.unwrap_or(DEFAULT_QUOTA_BYTES)
    }

    /// Storage file: environment override, then config, then data dir
    pub fn storage_path(&self) -> Option<PathBuf> {
        std::env::var_os(STORAGE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.storage_path.clone())
            .or_else(|| Self::data_dir().map(|dir| dir.join("storage.json")))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(Self::data_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn submission_latency(&self) -> Duration {
        Duration::from_millis(self.submission_latency_ms.unwrap_or(1200))
    }

    pub fn simulated_failures(&self) -> u32 {
        self.simulated_failures.unwrap_or(0)
    }
}
