//! Service configuration.
//!
//! Settings come from a TOML file (default `sales_insight.toml`); every key
//! has a default so a missing file section is fine. A `.env` file and the
//! process environment can override the config path, the data file, and
//! switch the source to synthetic data:
//!
//! - `SALES_INSIGHT_CONFIG`: path of the TOML file
//! - `SALES_DATA_FILE`     : overrides `data.file`
//! - `SALES_DEV_MODE`      : number of days of synthetic data to use instead of the CSV

use crate::analysis::extremes::{validate_threshold, DEFAULT_THRESHOLD};
use crate::ingest::sales_csv::{CsvLayout, DEFAULT_TIMESTAMP_FORMAT};
use crate::logging::LogLevel;
use crate::model::DecompositionModel;
use crate::pipeline::AnalysisOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "sales_insight.toml";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    Read { path: PathBuf, source: std::io::Error },
    /// The file is not valid TOML for `AppConfig`.
    Parse(toml::de::Error),
    /// A value is out of range.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Config structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub file: PathBuf,
    pub timestamp_column: String,
    pub value_column: String,
    pub timestamp_format: String,
    /// Days of synthetic data to analyse instead of `file`.
    pub dev_mode_days: Option<u32>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("sales.csv"),
            timestamp_column: "timestamp".to_string(),
            value_column: "sales".to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            dev_mode_days: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub model: DecompositionModel,
    pub extremes_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: DecompositionModel::Additive,
            extremes_threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub components_dir: PathBuf,
    pub write_components: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            components_dir: PathBuf::from("components"),
            write_components: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub console_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            console_timestamps: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Loads `.env`, then the config file it points at, then applies
    /// environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let path = std::env::var("SALES_INSIGHT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::load(&path)?;
        config.apply_overrides(
            std::env::var("SALES_DATA_FILE").ok().as_deref(),
            std::env::var("SALES_DEV_MODE").ok().as_deref(),
        )?;
        config.validate()?;
        Ok(config)
    }

    /// Applies the data-file and dev-mode overrides.
    pub fn apply_overrides(
        &mut self,
        data_file: Option<&str>,
        dev_mode_days: Option<&str>,
    ) -> Result<(), ConfigError> {
        if let Some(file) = data_file.filter(|f| !f.trim().is_empty()) {
            self.data.file = PathBuf::from(file.trim());
        }
        if let Some(days) = dev_mode_days.filter(|d| !d.trim().is_empty()) {
            let days = days.trim().parse::<u32>().map_err(|_| {
                ConfigError::Invalid(format!("SALES_DEV_MODE must be a day count, got '{}'", days))
            })?;
            self.data.dev_mode_days = Some(days);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_threshold(self.analysis.extremes_threshold)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.data.timestamp_column.trim().is_empty() || self.data.value_column.trim().is_empty() {
            return Err(ConfigError::Invalid("column names must not be empty".to_string()));
        }
        if self.data.dev_mode_days == Some(0) {
            return Err(ConfigError::Invalid("dev_mode_days must be positive".to_string()));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.logging.level.parse().map_err(ConfigError::Invalid)
    }

    pub fn csv_layout(&self) -> CsvLayout {
        CsvLayout {
            timestamp_column: self.data.timestamp_column.clone(),
            value_column: self.data.value_column.clone(),
            timestamp_format: self.data.timestamp_format.clone(),
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            model: self.analysis.model,
            extremes_threshold: self.analysis.extremes_threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
