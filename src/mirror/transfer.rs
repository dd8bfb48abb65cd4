//! Per-file download protocol
//!
//! One job, one file: check for an existing destination, stream the
//! content to a `.temp` sibling, then atomically rename into place. The
//! rename is the correctness-critical step: a crash mid-fetch leaves at
//! most a `.temp` artifact, never a partial file at the final path.

use crate::config::{PDF_EXPORT_MIME, TEMP_SUFFIX};
use crate::output::sanitize_destination;
use crate::remote::{EntryKind, RemoteError, RemoteStore};
use futures_util::StreamExt;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Transfer errors
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Fetch or export failed
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Temp write or final rename failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a download job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Content was fetched and renamed into place
    Downloaded {
        /// Total bytes written to the destination
        bytes: u64,
    },
    /// Destination already existed; no I/O performed
    Skipped,
}

/// Temp path for an in-progress download: `destination + ".temp"`.
fn temp_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Download one remote file to `destination`.
///
/// Existence of the sanitized destination short-circuits the job: a
/// re-run never re-fetches a completed file, and performs no staleness
/// check beyond existence. Google-native documents are exported as PDF
/// and the destination extension is forced to `.pdf`.
pub async fn download_entry(
    store: &dyn RemoteStore,
    file_id: &str,
    destination: &Path,
    kind: &EntryKind,
) -> Result<TransferOutcome, TransferError> {
    let mut destination = sanitize_destination(destination);

    if fs::try_exists(&destination).await.unwrap_or(false) {
        debug!(path = %destination.display(), "Destination exists, skipping download");
        return Ok(TransferOutcome::Skipped);
    }

    let mut stream = if kind.needs_export() {
        destination = destination.with_extension("pdf");
        store.export_content(file_id, PDF_EXPORT_MIME).await?
    } else {
        store.fetch_content(file_id).await?
    };

    let temp = temp_path(&destination);
    let mut file = fs::File::create(&temp).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        debug!(
            file_id,
            bytes_written = written,
            chunk = chunk.len(),
            "Download progress"
        );
    }

    file.flush().await?;
    drop(file);

    fs::rename(&temp, &destination).await?;
    info!(file_id, path = %destination.display(), bytes = written, "Downloaded file");

    Ok(TransferOutcome::Downloaded { bytes: written })
}
