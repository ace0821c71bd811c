//! Configuration file loading.
//!
//! Settings come from `gmrz.toml` in the current directory (or a path given on
//! the command line). Every key is optional; missing keys fall back to the OS
//! data directory and the working directory.

use crate::storage::{Storage, DATA_FILE_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "gmrz.toml";

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Output format of the printed leaderboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Paginated PDF document
    #[default]
    Pdf,
    /// Fixed-width plain text table
    Text,
}

/// Settings as written in the config file
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Roster data file. Defaults to the OS data directory.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Where the printed leaderboard goes. Defaults to `leaderboard.pdf`.
    #[serde(default)]
    pub report_file: Option<PathBuf>,
    #[serde(default)]
    pub report_format: Option<ReportFormat>,
    /// Log file. Defaults to `leaderboard.log` next to the data file.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    /// Layer `overrides` (command-line flags) on top of the file's settings
    pub fn merge(self, overrides: FileConfig) -> FileConfig {
        FileConfig {
            data_file: overrides.data_file.or(self.data_file),
            report_file: overrides.report_file.or(self.report_file),
            report_format: overrides.report_format.or(self.report_format),
            log_file: overrides.log_file.or(self.log_file),
        }
    }

    /// Load the config file at `path`.
    ///
    /// A missing file yields the default (empty) configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub report_file: PathBuf,
    pub report_format: ReportFormat,
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Resolve missing settings against defaults.
    ///
    /// `data_dir` is only consulted when the data file is not configured.
    pub fn resolve(file: FileConfig, data_dir: Option<PathBuf>) -> Self {
        let data_file = file.data_file.unwrap_or_else(|| {
            data_dir
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DATA_FILE_NAME)
        });
        let report_format = file.report_format.unwrap_or_default();
        let report_file = file
            .report_file
            .unwrap_or_else(|| default_report_file(report_format));
        let log_file = file.log_file.unwrap_or_else(|| data_file.with_file_name("leaderboard.log"));

        AppConfig {
            data_file,
            report_file,
            report_format,
            log_file,
        }
    }

    /// Load from `path` (or `gmrz.toml`), apply `overrides` and resolve
    /// against the OS data directory.
    ///
    /// A report format given only as an override still keeps a report path
    /// set in the file.
    pub fn load(path: Option<&Path>, overrides: FileConfig) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(CONFIG_FILE_NAME));
        let file = FileConfig::load(path)?.merge(overrides);
        Ok(Self::resolve(file, Storage::data_dir().ok()))
    }
}

/// Default report path for a format
pub fn default_report_file(format: ReportFormat) -> PathBuf {
    match format {
        ReportFormat::Pdf => PathBuf::from("leaderboard.pdf"),
        ReportFormat::Text => PathBuf::from("leaderboard.txt"),
    }
}
