//! Custom error types
//!
//! Only setup failures and fatal log errors are errors here. Per-testcase
//! problems (timeouts, spawn failures, non-zero exits) are recorded as
//! [`Outcome`](crate::benchmark::Outcome) values and never unwind the loop.

use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::constants::exit_codes;

/// Harness-wide error type
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    // Setup errors
    #[error("Testcase directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Testcase directory unreadable: {}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot create log file {}", .path.display())]
    LogFileUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    // Run errors
    #[error("Failed to write log file {}", .path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Interrupted")]
    Interrupted,
}

impl HarnessError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DirectoryNotFound(_) => "DIRECTORY_NOT_FOUND",
            Self::DirectoryUnreadable { .. } => "DIRECTORY_UNREADABLE",
            Self::LogFileUnwritable { .. } => "LOG_FILE_UNWRITABLE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::LogWrite { .. } => "LOG_WRITE_ERROR",
            Self::Interrupted => "INTERRUPTED",
        }
    }

    /// Process exit code the binary reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => exit_codes::INTERRUPTED,
            _ => exit_codes::FAILURE,
        }
    }

    /// Whether the error happened before any testcase was invoked
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound(_)
                | Self::DirectoryUnreadable { .. }
                | Self::LogFileUnwritable { .. }
                | Self::Configuration(_)
        )
    }
}

/// Result type alias for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
