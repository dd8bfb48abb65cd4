//! # Drive Mirror Library
//!
//! A library for mirroring a Google Drive folder tree onto the local
//! filesystem. Designed for one-shot backups of large hierarchies where
//! individual failures must be recorded rather than abort the run.
//!
//! ## Features
//!
//! - **Recursive Traversal**: Depth-first walk of the remote folder tree
//!   through the paginated listing API
//! - **Bounded Concurrency**: Fixed-size worker pool for file downloads;
//!   folder listing stays sequential so the remote API is never flooded
//! - **Atomic Writes**: Every file is fetched to a `.temp` path and renamed
//!   into place, so a partially written file is never observable
//! - **PDF Export**: Google-native documents (Docs, Sheets, Slides) are
//!   exported as PDF instead of fetched byte-for-byte
//! - **Failure Records**: Listing and download failures are appended to
//!   plain-text logs for operator follow-up; siblings keep going
//!
//! ## Quick Start
//!
//! ```no_run
//! use drive_mirror::mirror::{FailureLog, JobScheduler, MirrorDriver};
//! use drive_mirror::remote::drive::DriveClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(DriveClient::new("ya29.access-token"));
//! let failures = Arc::new(FailureLog::open(
//!     "failed_folders.txt",
//!     "failed_downloads.txt",
//! )?);
//!
//! let driver = MirrorDriver::new(store, failures);
//! let mut scheduler = JobScheduler::new(5);
//! driver.mirror_tree(&mut scheduler, "root", "./backup".as_ref()).await?;
//! scheduler.wait_idle().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`remote`] - Remote store trait and the Google Drive v3 client
//! - [`mirror`] - Traversal driver, bounded scheduler, download protocol,
//!   and failure recording
//! - [`output`] - Filesystem-safe destination path handling
//! - [`cli`] - Command implementations for the `drive-mirror` binary
//!
//! ## Failure Model
//!
//! Per-item errors (one folder listing, one file download) are terminal
//! for that item only: recorded and skipped, never retried within a run.
//! Only scheduler/resource exhaustion is fatal to the whole program.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// CLI command implementations
pub mod cli;

/// Shared configuration constants
pub mod config;

/// Tree mirroring engine
pub mod mirror;

/// Destination path handling
pub mod output;

/// Remote store boundary and Drive client
pub mod remote;

// Re-export commonly used types
pub use mirror::{FailureLog, JobScheduler, MirrorDriver, MirrorStats};
pub use remote::{ChildPage, EntryKind, RemoteEntry, RemoteStore};
