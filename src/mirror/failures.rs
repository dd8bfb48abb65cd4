//! Append-only failure records
//!
//! Two plain-text logs, one line per failure: `id,context,error`. The
//! logs are a terminal sink for operators; nothing in this system reads
//! them back, and failed items are never retried within a run.
//!
//! Appends from concurrent worker jobs are serialized through a mutex so
//! records never interleave mid-line. Error text is flattened to a single
//! line before writing; an error while appending is itself logged and
//! dropped, since losing one record must not take down the run.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;

/// Concurrency-safe writer for the two failure logs.
pub struct FailureLog {
    folders: Mutex<File>,
    downloads: Mutex<File>,
}

impl FailureLog {
    /// Open (creating if absent) both failure logs in append mode.
    pub fn open(
        failed_folders: impl AsRef<Path>,
        failed_downloads: impl AsRef<Path>,
    ) -> std::io::Result<Self> {
        Ok(Self {
            folders: Mutex::new(open_append(failed_folders.as_ref())?),
            downloads: Mutex::new(open_append(failed_downloads.as_ref())?),
        })
    }

    /// Record a failed folder listing: the folder's remote id, the local
    /// path being populated when it failed, and the error text.
    pub fn record_listing_failure(&self, folder_id: &str, context: &Path, error: &str) {
        self.append(&self.folders, folder_id, &context.display().to_string(), error);
    }

    /// Record a failed file download: the file's remote id, the intended
    /// destination path, and the error text.
    pub fn record_download_failure(&self, file_id: &str, intended_path: &Path, error: &str) {
        self.append(
            &self.downloads,
            file_id,
            &intended_path.display().to_string(),
            error,
        );
    }

    fn append(&self, target: &Mutex<File>, id: &str, context: &str, error: &str) {
        let line = format!("{id},{context},{}\n", flatten(error));
        // Lock scope covers the whole write so one record is one line.
        let mut file = match target.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = file.write_all(line.as_bytes()) {
            warn!(id, error = %e, "Failed to append failure record");
        }
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Keep one record on one line: embedded newlines become spaces.
fn flatten(error: &str) -> String {
    error.replace(['\n', '\r'], " ")
}
