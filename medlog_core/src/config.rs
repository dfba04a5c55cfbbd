//! Configuration file support for MedLog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/medlog/config.toml`.

use crate::{Error, JoinKey, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Which comparator decides week recency
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekOrderingKind {
    /// Descending string order of the week key (matches existing reports)
    #[default]
    Lexical,
    /// Descending by (year, week number)
    Chronological,
}

/// Report computation parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub join_key: JoinKey,

    #[serde(default)]
    pub week_ordering: WeekOrderingKind,

    #[serde(default = "default_trend_weeks")]
    pub trend_weeks: usize,

    #[serde(default = "default_excellent_threshold")]
    pub excellent_threshold: u32,

    #[serde(default = "default_good_threshold")]
    pub good_threshold: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            join_key: JoinKey::default(),
            week_ordering: WeekOrderingKind::default(),
            trend_weeks: default_trend_weeks(),
            excellent_threshold: default_excellent_threshold(),
            good_threshold: default_good_threshold(),
        }
    }
}

/// Export parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_export_file_name(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("medlog")
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_trend_weeks() -> usize {
    4
}

fn default_excellent_threshold() -> u32 {
    90
}

fn default_good_threshold() -> u32 {
    80
}

fn default_export_file_name() -> String {
    crate::export::EXPORT_FILE_NAME.to_string()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("medlog").join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        let report = &self.report;
        if report.trend_weeks == 0 {
            return Err(Error::Config("report.trend_weeks must be at least 1".into()));
        }
        if report.good_threshold > report.excellent_threshold {
            return Err(Error::Config(format!(
                "report.good_threshold ({}) exceeds report.excellent_threshold ({})",
                report.good_threshold, report.excellent_threshold
            )));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(Error::Config("export.file_name must not be empty".into()));
        }
        Ok(())
    }
}
