//! Structured logging for the sales insight service
//!
//! Provides context-rich logging with pipeline stage and resolution
//! identifiers, timestamps, and severity levels. Supports both console
//! output and file-based logging for scheduled batch runs.
//!
//! Logging before `init_logger` is a silent no-op, so library callers and
//! tests need no setup.

use crate::model::AnalysisError;
use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Aggregate,
    Decompose,
    Insight,
    Render,
    System,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingest => write!(f, "INGEST"),
            Stage::Aggregate => write!(f, "AGG"),
            Stage::Decompose => write!(f, "DECOMP"),
            Stage::Insight => write!(f, "INSIGHT"),
            Stage::Render => write!(f, "RENDER"),
            Stage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected outcome of the data, e.g. a closed period under the multiplicative model
    Expected,
    /// Contract violation or malformed input; points at a bug or bad source
    Unexpected,
    /// Depends on the data; cannot tell which
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn log(&self, level: LogLevel, stage: Stage, resolution: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let scope = resolution.map(|r| format!(" [{}]", r)).unwrap_or_default();
        let log_entry = format_entry(&timestamp.to_string(), level, stage, &scope, message);

        // Console output; stdout is reserved for reports, so everything goes to stderr
        if self.console_timestamps {
            eprintln!("{}", log_entry);
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", stage, scope, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", stage, scope, message),
                LogLevel::Info => eprintln!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

fn format_entry(timestamp: &str, level: LogLevel, stage: Stage, scope: &str, message: &str) -> String {
    format!("{} {} {}{}: {}", timestamp, level, stage, scope, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, stage: Stage, resolution: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, stage, resolution, message);
        }
    }
}

/// Log a general informational message
pub fn info(stage: Stage, resolution: Option<&str>, message: &str) {
    emit(LogLevel::Info, stage, resolution, message);
}

/// Log a warning message
pub fn warn(stage: Stage, resolution: Option<&str>, message: &str) {
    emit(LogLevel::Warning, stage, resolution, message);
}

/// Log an error message
pub fn error(stage: Stage, resolution: Option<&str>, message: &str) {
    emit(LogLevel::Error, stage, resolution, message);
}

/// Log a debug message
pub fn debug(stage: Stage, resolution: Option<&str>, message: &str) {
    emit(LogLevel::Debug, stage, resolution, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an analysis error raised inside a resolution pass
pub fn classify_failure(err: &AnalysisError) -> FailureType {
    match err {
        // The gate is meant to make this unreachable
        AnalysisError::InsufficientData { .. } => FailureType::Unexpected,
        AnalysisError::InvalidIndex { .. } => FailureType::Unexpected,
        AnalysisError::Config(_) => FailureType::Unexpected,
        // Zero-filled closed hours or days leave a zero seasonal index
        AnalysisError::DivisionByZero {
            component: "seasonal" | "seasonal mean",
            ..
        } => FailureType::Expected,
        // A zero trend needs a long run of empty buckets
        AnalysisError::DivisionByZero { .. } => FailureType::Unknown,
    }
}

/// Log an analysis failure with automatic classification
pub fn log_analysis_failure(stage: Stage, resolution: &str, err: &AnalysisError) {
    let failure_type = classify_failure(err);
    let message = format!("{} failed [{}]: {}", stage, failure_type, err);

    match failure_type {
        FailureType::Expected => info(stage, Some(resolution), &message),
        FailureType::Unexpected => error(stage, Some(resolution), &message),
        FailureType::Unknown => warn(stage, Some(resolution), &message),
    }
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of one analysis run
pub fn log_run_summary(total: usize, decomposed: usize, insufficient: usize, failed: usize) {
    let message = format!(
        "Analysis complete: {}/{} resolutions decomposed, {} without enough data, {} failed",
        decomposed, total, insufficient, failed
    );

    if decomposed == total {
        info(Stage::System, None, &message);
    } else if decomposed == 0 {
        error(Stage::System, None, &message);
    } else {
        warn(Stage::System, None, &message);
    }
}
