//! Application-wide constants
//!
//! Defaults and fixed strings used by the harness. Constants are grouped
//! by their purpose for better organization.

// =============================================================================
// EXECUTION DEFAULTS
// =============================================================================

/// Default per-testcase wall-clock timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 600.0;

// =============================================================================
// LOG FILE
// =============================================================================

/// Default destination of the run log, relative to the harness's cwd
pub const DEFAULT_LOG_PATH: &str = "./log.csv";

/// Header written by the plain log format
pub const LOG_HEADER: &str = "testcase,time";

/// Header written when outcome columns are enabled
pub const LOG_HEADER_WITH_STATUS: &str = "testcase,time,status,exit_code";

/// Field separator
pub const FIELD_SEPARATOR: char = ',';

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Environment variable names read as flag fallbacks
pub mod env_vars {
    pub const TIMEOUT: &str = "CHRONOS_TIMEOUT_SECS";
    pub const LOG_PATH: &str = "CHRONOS_LOG_PATH";
}

// =============================================================================
// EXIT CODES
// =============================================================================

/// Process exit codes
pub mod exit_codes {
    /// Setup failure or fatal log error
    pub const FAILURE: i32 = 1;
    /// Stopped by SIGINT / SIGTERM (128 + SIGINT)
    pub const INTERRUPTED: i32 = 130;
}
