//! Command-line interface for the benchmark harness.

use std::path::PathBuf;

use clap::Parser;

use crate::constants::{DEFAULT_LOG_PATH, DEFAULT_TIMEOUT_SECONDS, env_vars};

/// Batch benchmark harness.
///
/// Runs an executable once per file in a testcase directory, in filename
/// order, under a hard wall-clock timeout, and writes the elapsed time of
/// every run to a CSV log.
///
/// Example: chronos --testcases_dir ../testcases/sat/ --exec ./build/solver --args="--input" --cwd=./build
#[derive(Parser, Debug, Clone)]
#[command(name = "chronos")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing testcases.
    #[arg(long = "testcases_dir", visible_alias = "testcases-dir", value_name = "DIR")]
    pub testcases_dir: PathBuf,

    /// Executable to run.
    #[arg(long, value_name = "PATH")]
    pub exec: PathBuf,

    /// Working directory when running the executable.
    ///
    /// Defaults to the harness's own working directory.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Arguments to pass to the executable, before the testcase path.
    ///
    /// Split on whitespace; no shell quoting is applied.
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub args: Option<String>,

    /// Per-testcase wall-clock timeout in seconds.
    #[arg(long, value_name = "SECONDS", env = env_vars::TIMEOUT, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout: f64,

    /// Where to write the CSV log.
    #[arg(long, value_name = "PATH", env = env_vars::LOG_PATH, default_value = DEFAULT_LOG_PATH)]
    pub log: PathBuf,

    /// Add `status` and `exit_code` columns to the log.
    #[arg(long)]
    pub with_status: bool,

    /// Discard the executable's stdout and stderr instead of inheriting them.
    #[arg(long)]
    pub discard_output: bool,

    /// Hide the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
