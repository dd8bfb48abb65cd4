//! Depth-first tree traversal
//!
//! One control task walks the remote hierarchy: folder listings are
//! sequential (page by page, child by child), and only leaf downloads are
//! handed to the worker pool. A listing failure anywhere in a subtree is
//! recorded against that subtree's root entry and the traversal moves on
//! to the next sibling; only scheduler failures abort the run.

use crate::mirror::transfer::{download_entry, TransferOutcome};
use crate::mirror::{FailureLog, JobScheduler, MirrorError, MirrorResult, MirrorStats};
use crate::remote::{EntryKind, RemoteEntry, RemoteStore};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Walks the remote tree and feeds the download scheduler.
pub struct MirrorDriver {
    store: Arc<dyn RemoteStore>,
    failures: Arc<FailureLog>,
    stats: Arc<MirrorStats>,
}

impl MirrorDriver {
    /// Create a driver over a remote store and a failure log.
    pub fn new(store: Arc<dyn RemoteStore>, failures: Arc<FailureLog>) -> Self {
        Self {
            store,
            failures,
            stats: Arc::new(MirrorStats::default()),
        }
    }

    /// Shared run counters, updated live by worker jobs.
    pub fn stats(&self) -> Arc<MirrorStats> {
        self.stats.clone()
    }

    /// Mirror the subtree rooted at `root_folder_id` into `local_root`.
    ///
    /// Returns once every folder has been visited and every download job
    /// has been submitted. Jobs may still be in flight: the caller must
    /// wait on [`JobScheduler::wait_idle`] before treating the mirror as
    /// complete.
    ///
    /// An error from this function is fatal: either the root itself could
    /// not be listed or created, or the worker pool is broken. Failures
    /// below the root are recorded and skipped instead.
    pub async fn mirror_tree(
        &self,
        scheduler: &mut JobScheduler,
        root_folder_id: &str,
        local_root: &Path,
    ) -> MirrorResult<()> {
        std::fs::create_dir_all(local_root)?;
        info!(
            root_folder_id,
            local_root = %local_root.display(),
            workers = scheduler.capacity(),
            "Starting mirror"
        );
        self.visit_folder(scheduler, root_folder_id, local_root)
            .await
    }

    /// Visit one folder: page through its listing, recurse into child
    /// folders, submit one download job per file.
    fn visit_folder<'a>(
        &'a self,
        scheduler: &'a mut JobScheduler,
        folder_id: &'a str,
        local_path: &'a Path,
    ) -> BoxFuture<'a, MirrorResult<()>> {
        async move {
            let mut page_token: Option<String> = None;
            let mut claimed_names: HashSet<String> = HashSet::new();
            let mut seen_any = false;

            loop {
                let page = self
                    .store
                    .list_children(folder_id, page_token.as_deref())
                    .await?;
                seen_any = seen_any || !page.entries.is_empty();

                for entry in page.entries {
                    match entry.kind {
                        EntryKind::Folder => {
                            if let Err(e) =
                                self.visit_child_folder(&mut *scheduler, &entry, local_path).await
                            {
                                if matches!(e, MirrorError::Scheduler(_)) {
                                    return Err(e);
                                }
                                warn!(
                                    folder = %entry.name,
                                    id = %entry.id,
                                    error = %e,
                                    "Failed to mirror subtree, continuing with siblings"
                                );
                                self.failures.record_listing_failure(
                                    &entry.id,
                                    local_path,
                                    &e.to_string(),
                                );
                                self.stats.folders_failed.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                        EntryKind::File { .. } => {
                            self.submit_download(scheduler, entry, local_path, &mut claimed_names)
                                .await?;
                        }
                    }
                }

                match page.next_page_token {
                    Some(token) => {
                        debug!(folder_id, "Fetching next listing page");
                        page_token = Some(token);
                    }
                    None => break,
                }
            }

            if !seen_any {
                debug!(folder_id, "No entries found in folder");
            }
            debug!(folder_id, "Completed folder");
            Ok(())
        }
        .boxed()
    }

    /// Create the child directory (idempotent) and recurse into it.
    async fn visit_child_folder(
        &self,
        scheduler: &mut JobScheduler,
        entry: &RemoteEntry,
        parent_path: &Path,
    ) -> MirrorResult<()> {
        // Directory names are used verbatim; only file stems are bounded.
        let child_path = parent_path.join(&entry.name);
        std::fs::create_dir_all(&child_path)?;
        info!(folder = %entry.name, id = %entry.id, "Entering folder");
        self.visit_folder(scheduler, &entry.id, &child_path).await
    }

    /// Queue one file download on the worker pool. Fire-and-forget: the
    /// job records its own failures.
    async fn submit_download(
        &self,
        scheduler: &mut JobScheduler,
        entry: RemoteEntry,
        local_path: &Path,
        claimed_names: &mut HashSet<String>,
    ) -> MirrorResult<()> {
        let name = claim_name(claimed_names, destination_name(&entry), &entry.id);
        let destination = local_path.join(&name);
        info!(file = %entry.name, id = %entry.id, "Queueing download");

        let store = self.store.clone();
        let failures = self.failures.clone();
        let stats = self.stats.clone();
        let RemoteEntry { id, kind, .. } = entry;

        scheduler
            .submit(async move {
                match download_entry(store.as_ref(), &id, &destination, &kind).await {
                    Ok(TransferOutcome::Downloaded { .. }) => {
                        stats.files_downloaded.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(TransferOutcome::Skipped) => {
                        stats.files_skipped.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        warn!(id, path = %destination.display(), error = %e, "Download failed");
                        failures.record_download_failure(&id, &destination, &e.to_string());
                        stats.files_failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
            .await?;
        Ok(())
    }
}

/// Local filename for a file entry. Google-native documents get a `.pdf`
/// suffix appended, since their content is exported as PDF.
fn destination_name(entry: &RemoteEntry) -> String {
    if entry.kind.needs_export() {
        format!("{}.pdf", entry.name)
    } else {
        entry.name.clone()
    }
}

/// Claim a filename among this folder's siblings. Duplicate names get the
/// remote id spliced in before the extension so two siblings never target
/// the same destination path.
fn claim_name(claimed: &mut HashSet<String>, name: String, id: &str) -> String {
    if claimed.insert(name.clone()) {
        return name;
    }
    let unique = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{id}.{ext}"),
        _ => format!("{name}_{id}"),
    };
    claimed.insert(unique.clone());
    unique
}
