//! Chronos - Batch Benchmark Harness
//!
//! Runs a solver executable once per file in a testcase directory, under a
//! hard wall-clock timeout, and records the elapsed time of each run in a
//! CSV log that survives crashes of the harness itself.
//!
//! # Architecture
//!
//! - **CLI / Config**: flag parsing and the immutable [`HarnessConfig`]
//! - **Benchmark**: enumeration, timed execution, logging and the driver loop
//! - **Error**: setup and fatal run errors; per-testcase problems are
//!   [`Outcome`](benchmark::Outcome)s, not errors

pub mod benchmark;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use benchmark::{HarnessRunner, RunSummary};
pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
