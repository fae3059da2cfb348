//! Benchmark execution engine
//!
//! A run is a single sequential pass over a testcase directory:
//!
//! 1. **Enumeration** (`testcase.rs`): regular files, sorted by name.
//! 2. **Execution** (`executor.rs`): one child process per testcase under a
//!    hard wall-clock timeout, killed with its process group on expiry.
//! 3. **Logging** (`logger.rs`): one durable CSV line per testcase.
//! 4. **Driving** (`runner.rs`): ties the above together with progress
//!    reporting (`progress.rs`).

pub mod executor;
pub mod logger;
pub mod outcome;
pub mod progress;
pub mod runner;
pub mod testcase;

pub use executor::Executor;
pub use logger::RunLogger;
pub use outcome::{Outcome, RunResult};
pub use progress::ProgressReporter;
pub use runner::{HarnessRunner, RunSummary};
pub use testcase::{TestcaseRef, TestcaseSet};
