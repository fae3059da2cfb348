//! Harness configuration
//!
//! Resolves command-line flags into an immutable [`HarnessConfig`]. Paths
//! are made absolute up front so that changing the child's working
//! directory never changes what the testcase paths point at.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::constants::{DEFAULT_LOG_PATH, DEFAULT_TIMEOUT_SECONDS};

/// Shape of the CSV log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `testcase,time`
    #[default]
    Plain,
    /// `testcase,time,status,exit_code`
    WithStatus,
}

/// What the child's stdout/stderr are connected to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamMode {
    #[default]
    Inherit,
    Discard,
}

/// Resolved configuration for one harness run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory of testcase files (absolute)
    pub testcases_dir: PathBuf,
    /// Executable under test (absolute)
    pub exec: PathBuf,
    /// Working directory for the child; `None` keeps the harness's cwd
    pub cwd: Option<PathBuf>,
    /// Argument words inserted between the executable and the testcase path
    pub args: Vec<String>,
    /// Per-testcase wall-clock timeout
    pub timeout: Duration,
    /// Log destination
    pub log_path: PathBuf,
    pub log_format: LogFormat,
    pub stream_mode: StreamMode,
    /// Show a progress bar
    pub progress: bool,
}

impl HarnessConfig {
    /// Configuration with every optional setting at its default
    pub fn new(testcases_dir: impl Into<PathBuf>, exec: impl Into<PathBuf>) -> Self {
        Self {
            testcases_dir: testcases_dir.into(),
            exec: exec.into(),
            cwd: None,
            args: Vec::new(),
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECONDS),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            log_format: LogFormat::Plain,
            stream_mode: StreamMode::Inherit,
            progress: true,
        }
    }

    /// Build the configuration from parsed flags
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.exec.as_os_str().is_empty() {
            return Err(ConfigError::Missing("--exec".to_string()));
        }
        if cli.testcases_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing("--testcases_dir".to_string()));
        }

        Ok(Self {
            testcases_dir: absolute(&cli.testcases_dir)?,
            exec: absolute(&cli.exec)?,
            cwd: cli.cwd.clone(),
            args: split_args(cli.args.as_deref()),
            timeout: parse_timeout(cli.timeout)?,
            log_path: cli.log.clone(),
            log_format: if cli.with_status {
                LogFormat::WithStatus
            } else {
                LogFormat::Plain
            },
            stream_mode: if cli.discard_output {
                StreamMode::Discard
            } else {
                StreamMode::Inherit
            },
            progress: !cli.no_progress,
        })
    }
}

/// Split an argument template into words
pub fn split_args(template: Option<&str>) -> Vec<String> {
    template
        .map(|t| t.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn parse_timeout(seconds: f64) -> Result<Duration, ConfigError> {
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(ConfigError::InvalidValue(format!(
            "--timeout must be a positive number of seconds, got {}",
            seconds
        )));
    }
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| ConfigError::InvalidValue(format!("--timeout {}: {}", seconds, e)))
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path)
        .map_err(|e| ConfigError::InvalidValue(format!("{}: {}", path.display(), e)))
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required value: {0}")]
    Missing(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
