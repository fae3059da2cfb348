//! Harness driver - enumerate, invoke, log, report progress
//!
//! Testcases run strictly one at a time, in filename order. Per-testcase
//! failures are recorded and never stop the loop; only setup failures, log
//! write failures and operator interruption do.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::utils::time::format_std_duration;

use super::executor::Executor;
use super::logger::RunLogger;
use super::outcome::{Outcome, RunResult};
use super::progress::ProgressReporter;
use super::testcase::TestcaseSet;

/// Aggregate counters for one harness run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Testcases processed
    pub total: usize,
    pub completed: usize,
    pub timed_out: usize,
    pub invocation_errors: usize,
    /// Completed runs with a non-zero exit code or a terminating signal
    pub abnormal_exits: usize,
    /// Wall time of the whole loop
    pub elapsed: Duration,
    pub log_path: PathBuf,
}

impl RunSummary {
    fn record(&mut self, result: &RunResult) {
        match result.outcome {
            Outcome::Completed => self.completed += 1,
            Outcome::TimedOut => self.timed_out += 1,
            Outcome::InvocationError => self.invocation_errors += 1,
        }
        if result.is_abnormal_exit() {
            self.abnormal_exits += 1;
        }
    }
}

/// Log the outcome of one testcase
fn report(result: &RunResult, timeout: Duration) {
    match result.outcome {
        Outcome::Completed => tracing::debug!(
            "{} -> {} in {}s (exit {:?}, signal {:?})",
            result.testcase,
            result.outcome,
            result.elapsed_seconds(),
            result.exit_code,
            result.signal
        ),
        Outcome::TimedOut => tracing::warn!(
            "Testcase {} timed out after {:?}, process group killed",
            result.testcase,
            timeout
        ),
        Outcome::InvocationError => tracing::warn!(
            "Testcase {}: {}",
            result.testcase,
            result.error_message.as_deref().unwrap_or("invocation failed")
        ),
    }
}

/// Drives one full harness run
pub struct HarnessRunner {
    config: HarnessConfig,
    executor: Executor,
}

impl HarnessRunner {
    /// Create a new harness runner
    pub fn new(config: HarnessConfig) -> Self {
        let executor = Executor::new(&config);
        Self { config, executor }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every testcase once.
    ///
    /// Fails before touching the log if the testcase directory cannot be
    /// listed, and before invoking anything if the log cannot be created.
    /// When `shutdown` is set the running child is killed, the log is
    /// released with the current identifier left dangling, and
    /// [`HarnessError::Interrupted`] is returned.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> HarnessResult<RunSummary> {
        let testcases = TestcaseSet::scan(&self.config.testcases_dir).await?;
        tracing::info!(
            "Found {} testcases in {}",
            testcases.len(),
            self.config.testcases_dir.display()
        );

        let mut logger = RunLogger::create(&self.config.log_path, self.config.log_format).await?;
        let progress = ProgressReporter::new(testcases.len(), self.config.progress);

        let mut summary = RunSummary {
            log_path: self.config.log_path.clone(),
            ..Default::default()
        };
        let started = Instant::now();

        for testcase in testcases.iter() {
            if *shutdown.borrow() {
                progress.abandon();
                return Err(HarnessError::Interrupted);
            }

            progress.start(&testcase.name);
            logger.begin_record(&testcase.name).await?;

            let result = match self.executor.run(&testcase, &mut shutdown).await {
                Ok(result) => result,
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            };

            logger.end_record(&result).await?;
            progress.suspend(|| report(&result, self.config.timeout));

            summary.record(&result);
            summary.total = progress.advance() as usize;
        }

        summary.elapsed = started.elapsed();
        progress.finish();
        logger.finish().await?;

        tracing::info!(
            "Ran {} testcases in {} ({} completed, {} timed out, {} invocation errors)",
            summary.total,
            format_std_duration(summary.elapsed),
            summary.completed,
            summary.timed_out,
            summary.invocation_errors
        );

        Ok(summary)
    }
}
