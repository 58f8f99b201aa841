//! PrintPlan configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PrintPlanError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrintPlanConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub split: SplitConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl PrintPlanConfig {
    /// Load config from the default path (~/.printplan/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PrintPlanError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| PrintPlanError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| PrintPlanError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the PrintPlan home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".printplan")
    }
}

/// Where job splits are kept between edit sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String { "~/.printplan/jobs".into() }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StoreConfig {
    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir).to_string())
    }
}

/// Parsing rules for quantities typed into week cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Characters stripped from raw input before parsing ("12,500" → 12500).
    #[serde(default = "default_separators")]
    pub thousands_separators: String,
    /// Longest split a date range may seed; longer ranges seed nothing.
    #[serde(default = "default_max_weeks")]
    pub max_weeks: usize,
}

fn default_separators() -> String { ",".into() }
fn default_max_weeks() -> usize { 520 }

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            thousands_separators: default_separators(),
            max_weeks: default_max_weeks(),
        }
    }
}

impl SplitConfig {
    /// Separator used when formatting quantities for display.
    pub fn display_separator(&self) -> Option<char> {
        self.thousands_separators.chars().next()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "printplan=info,printplan_split=info".into() }

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
