//! Durable CSV run log
//!
//! Every field is flushed and synced to storage as soon as it is written,
//! so a crash or kill mid-run leaves all finished lines intact and at most a
//! dangling identifier for the testcase that was running.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::LogFormat;
use crate::constants::{FIELD_SEPARATOR, LOG_HEADER, LOG_HEADER_WITH_STATUS};
use crate::error::{HarnessError, HarnessResult};

use super::outcome::RunResult;

/// Append-only writer for the run log
///
/// Owns the file handle. [`RunLogger::finish`] closes it on normal
/// completion; on any other exit path dropping the logger releases it.
#[derive(Debug)]
pub struct RunLogger {
    path: PathBuf,
    file: File,
    format: LogFormat,
}

impl RunLogger {
    /// Create (or truncate) the log at `path` and write the header line
    pub async fn create(path: &Path, format: LogFormat) -> HarnessResult<Self> {
        let unwritable = |source| HarnessError::LogFileUnwritable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).await.map_err(unwritable)?;
        let mut logger = Self {
            path: path.to_path_buf(),
            file,
            format,
        };

        let header = match format {
            LogFormat::Plain => LOG_HEADER,
            LogFormat::WithStatus => LOG_HEADER_WITH_STATUS,
        };
        logger
            .write_durable(&format!("{}\n", header))
            .await
            .map_err(unwritable)?;

        tracing::debug!("Opened run log {}", path.display());
        Ok(logger)
    }

    /// Write the testcase identifier and the field separator
    pub async fn begin_record(&mut self, name: &str) -> HarnessResult<()> {
        let field = format!("{}{}", escape_field(name), FIELD_SEPARATOR);
        self.write_durable(&field).await.map_err(|e| self.write_error(e))
    }

    /// Write the rest of the line for `result`
    pub async fn end_record(&mut self, result: &RunResult) -> HarnessResult<()> {
        let tail = record_tail(result, self.format);
        self.write_durable(&tail).await.map_err(|e| self.write_error(e))
    }

    /// Flush, sync and close the log
    pub async fn finish(mut self) -> HarnessResult<()> {
        self.file.flush().await.map_err(|e| self.write_error(e))?;
        self.file.sync_all().await.map_err(|e| self.write_error(e))?;
        tracing::debug!("Closed run log {}", self.path.display());
        Ok(())
    }

    async fn write_durable(&mut self, data: &str) -> io::Result<()> {
        self.file.write_all(data.as_bytes()).await?;
        self.file.flush().await?;
        self.file.sync_data().await
    }

    fn write_error(&self, source: io::Error) -> HarnessError {
        HarnessError::LogWrite {
            path: self.path.clone(),
            source,
        }
    }
}

/// Everything after the identifier, including the line terminator
fn record_tail(result: &RunResult, format: LogFormat) -> String {
    match format {
        LogFormat::Plain => format!("{}\n", result.elapsed_seconds()),
        LogFormat::WithStatus => format!(
            "{secs}{sep}{status}{sep}{exit}\n",
            secs = result.elapsed_seconds(),
            status = result.outcome.code(),
            exit = result.exit_code.map(|c| c.to_string()).unwrap_or_default(),
            sep = FIELD_SEPARATOR,
        ),
    }
}

/// Quote a field if it would break the CSV line
fn escape_field(field: &str) -> String {
    if field.contains([FIELD_SEPARATOR, '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
