//! Progress reporting for the testcase loop
//!
//! Example output:
//! ```text
//! ⠋ [00:12:40] ████████░░░░░░░░░░░░ 14/37 ETA 00:21:03 b.cnf
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} ETA {eta_precise} {msg}";

/// Counts processed testcases out of the total
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a reporter for `total` testcases; hidden when not `enabled`
    pub fn new(total: usize, enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };

        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        bar.set_style(style);
        if enabled {
            bar.enable_steady_tick(Duration::from_millis(250));
        }

        Self { bar }
    }

    /// Show the testcase that is about to run
    pub fn start(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    /// One more testcase processed, whatever its outcome; returns the count
    pub fn advance(&self) -> u64 {
        self.bar.inc(1);
        self.bar.position()
    }

    /// Run `f` with the bar cleared, so its output is not interleaved
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }

    /// Leave the bar where it stopped
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
