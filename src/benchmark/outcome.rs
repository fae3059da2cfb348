//! Outcome types for a single timed invocation

use std::time::Duration;

use crate::utils::time::format_seconds;

/// Classification of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Process exited on its own, with any exit status
    Completed,
    /// Killed after the timeout elapsed
    TimedOut,
    /// Process could not be spawned
    InvocationError,
}

impl Outcome {
    /// Get the code written to the status column
    pub fn code(&self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::TimedOut => "timed_out",
            Outcome::InvocationError => "invocation_error",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result of running the executable against one testcase
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Testcase display name
    pub testcase: String,

    /// Outcome classification
    pub outcome: Outcome,

    /// Wall-clock time from spawn to observed exit
    pub elapsed: Duration,

    /// Exit code, when the process exited normally
    pub exit_code: Option<i32>,

    /// Signal that terminated the process, when not killed by the harness
    pub signal: Option<i32>,

    /// Spawn error message
    pub error_message: Option<String>,
}

impl RunResult {
    /// Create a completed result
    pub fn completed(
        testcase: impl Into<String>,
        elapsed: Duration,
        exit_code: Option<i32>,
        signal: Option<i32>,
    ) -> Self {
        Self {
            testcase: testcase.into(),
            outcome: Outcome::Completed,
            elapsed,
            exit_code,
            signal,
            error_message: None,
        }
    }

    /// Create a timed-out result; elapsed is pinned to the timeout bound
    pub fn timed_out(testcase: impl Into<String>, timeout: Duration) -> Self {
        Self {
            testcase: testcase.into(),
            outcome: Outcome::TimedOut,
            elapsed: timeout,
            exit_code: None,
            signal: None,
            error_message: None,
        }
    }

    /// Create an invocation error result
    pub fn invocation_error(testcase: impl Into<String>, elapsed: Duration, message: String) -> Self {
        Self {
            testcase: testcase.into(),
            outcome: Outcome::InvocationError,
            elapsed,
            exit_code: None,
            signal: None,
            error_message: Some(message),
        }
    }

    /// Elapsed seconds with three decimals, as written to the log
    pub fn elapsed_seconds(&self) -> String {
        format_seconds(self.elapsed)
    }

    /// Completed, but with a non-zero exit code or a terminating signal
    pub fn is_abnormal_exit(&self) -> bool {
        self.outcome == Outcome::Completed
            && (self.signal.is_some() || self.exit_code.is_some_and(|c| c != 0))
    }
}
