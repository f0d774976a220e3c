//! YAML configuration for the ledger.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```yaml
//! fees:
//!   advertising_rate: 0.03
//!   platform_rate: 0.02
//! calendar:
//!   week_starts_on: Sun
//! export:
//!   file_name: transactions_report.csv
//! ```

use crate::error::ConfigError;
use crate::export::REPORT_FILE_NAME;
use crate::fees::FeeSchedule;
use chrono::Weekday;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Calendar conventions for time-range tabs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarConfig {
    /// First day of the week for the "this week" tab
    #[serde(default = "default_week_start")]
    pub week_starts_on: Weekday,
}

fn default_week_start() -> Weekday {
    Weekday::Sun
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_starts_on: default_week_start(),
        }
    }
}

/// Report export settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportConfig {
    /// File name used when saving the report
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    REPORT_FILE_NAME.to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub fees: FeeSchedule,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as null, not as an empty map
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fees.validate()?;

        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "export.file_name",
                message: "file name must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
