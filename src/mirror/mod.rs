//! Tree mirroring engine
//!
//! This module contains the core of the system:
//!
//! 1. **Traversal**: [`traversal::MirrorDriver`] walks the remote tree
//!    depth-first, creating local directories and submitting one download
//!    job per file
//! 2. **Scheduling**: [`scheduler::JobScheduler`] bounds how many
//!    downloads run at once and provides the end-of-run barrier
//! 3. **Transfer**: [`transfer::download_entry`] performs the atomic
//!    fetch-to-temp-then-rename protocol for a single file
//! 4. **Failure Recording**: [`failures::FailureLog`] appends listing and
//!    download failures without ever aborting the run
//!
//! # Error Handling
//!
//! Per-item errors are recorded and never propagate past the traversal or
//! a worker job. The only error class that escapes is
//! [`scheduler::SchedulerError`]: it means the worker pool itself is
//! broken and the program should terminate.

use std::sync::atomic::{AtomicU64, Ordering};

/// Append-only failure records
pub mod failures;

/// Bounded job scheduling
pub mod scheduler;

/// Per-file download protocol
pub mod transfer;

/// Depth-first tree traversal
pub mod traversal;

pub use failures::FailureLog;
pub use scheduler::{JobScheduler, SchedulerError};
pub use transfer::{download_entry, TransferError, TransferOutcome};
pub use traversal::MirrorDriver;

/// Mirror errors
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// Remote listing call failed
    #[error("remote error: {0}")]
    Remote(#[from] crate::remote::RemoteError),

    /// Local filesystem operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Worker pool failure; fatal, never recorded-and-skipped
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Result type for mirror operations
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Run counters shared between the traversal and worker jobs.
///
/// Purely observational; reported once at the end of a run.
#[derive(Debug, Default)]
pub struct MirrorStats {
    /// Files fetched and renamed into place
    pub files_downloaded: AtomicU64,
    /// Files skipped because the destination already existed
    pub files_skipped: AtomicU64,
    /// Files whose download failed and was recorded
    pub files_failed: AtomicU64,
    /// Folders whose listing failed and was recorded
    pub folders_failed: AtomicU64,
}

impl MirrorStats {
    /// Snapshot the counters as plain values.
    pub fn snapshot(&self) -> (u64, u64, u64, u64) {
        (
            self.files_downloaded.load(Ordering::Relaxed),
            self.files_skipped.load(Ordering::Relaxed),
            self.files_failed.load(Ordering::Relaxed),
            self.folders_failed.load(Ordering::Relaxed),
        )
    }
}
