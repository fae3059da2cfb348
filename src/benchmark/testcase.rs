//! Testcase enumeration

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{HarnessError, HarnessResult};

/// One input file from the testcase directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestcaseRef {
    /// Base filename, used as the log identifier
    pub name: String,
    /// Absolute path passed to the executable
    pub path: PathBuf,
}

/// Ordered set of testcases found in a directory
///
/// Holds the sorted listing; [`TestcaseSet::iter`] can be called any number
/// of times and always yields the same sequence.
#[derive(Debug, Clone, Default)]
pub struct TestcaseSet {
    entries: Vec<(OsString, PathBuf)>,
}

impl TestcaseSet {
    /// List the regular files in `dir`, sorted by filename
    ///
    /// Symlinks that resolve to regular files are included. Subdirectories,
    /// dangling symlinks and other special files are skipped. Does not recurse.
    pub async fn scan(dir: &Path) -> HarnessResult<Self> {
        let meta = match fs::metadata(dir).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(HarnessError::DirectoryNotFound(dir.to_path_buf()));
            }
            Err(source) => {
                return Err(HarnessError::DirectoryUnreadable {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };
        if !meta.is_dir() {
            return Err(HarnessError::DirectoryNotFound(dir.to_path_buf()));
        }

        let unreadable = |source| HarnessError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        };

        let mut read_dir = fs::read_dir(dir).await.map_err(unreadable)?;
        let mut entries = Vec::new();

        while let Some(entry) = read_dir.next_entry().await.map_err(unreadable)? {
            let path = entry.path();
            // Follows symlinks, so a link to a file counts as a file
            match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => entries.push((entry.file_name(), path)),
                Ok(_) => tracing::debug!("Skipping non-file entry {}", path.display()),
                Err(e) => tracing::debug!("Skipping unreadable entry {}: {}", path.display(), e),
            }
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));

        tracing::debug!("Found {} testcases in {}", entries.len(), dir.display());

        Ok(Self { entries })
    }

    /// Number of testcases
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the testcases in filename order
    pub fn iter(&self) -> impl Iterator<Item = TestcaseRef> + '_ {
        self.entries.iter().map(|(name, path)| TestcaseRef {
            name: name.to_string_lossy().into_owned(),
            path: path.clone(),
        })
    }
}
