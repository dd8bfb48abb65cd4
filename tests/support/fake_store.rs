//! In-memory remote store for tests
//!
//! Supports pagination, listing failure injection, mid-stream fetch
//! failures, call counting for idempotency checks, and an in-flight
//! gauge for concurrency-bound assertions.

use async_trait::async_trait;
use bytes::Bytes;
use drive_mirror::remote::{
    ByteStream, ChildPage, EntryKind, RemoteEntry, RemoteError, RemoteResult, RemoteStore,
};
use futures_util::{stream, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Chunk size used when replaying file content, small enough that every
/// non-trivial file exercises multi-chunk delivery.
const CHUNK_SIZE: usize = 4;

/// How a fake file behaves when fetched.
pub enum FileBehavior {
    /// Deliver this content in chunks
    Content(Vec<u8>),
    /// Fail before any bytes are delivered
    FailImmediately(String),
    /// Deliver one partial chunk, then fail mid-stream
    FailAfterChunk(Vec<u8>, String),
}

/// In-memory folder tree implementing [`RemoteStore`].
pub struct InMemoryStore {
    children: HashMap<String, Vec<RemoteEntry>>,
    files: HashMap<String, FileBehavior>,
    failing_folders: HashSet<String>,
    page_size: usize,
    fetch_delay: Option<Duration>,
    /// Number of fetch_content calls made
    pub fetch_calls: AtomicU64,
    /// Number of export_content calls made
    pub export_calls: AtomicU64,
    in_flight: AtomicUsize,
    /// Highest number of concurrently active fetch/export calls observed
    pub max_in_flight: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            children: HashMap::from([("root".to_string(), Vec::new())]),
            files: HashMap::new(),
            failing_folders: HashSet::new(),
            page_size: 100,
            fetch_delay: None,
            fetch_calls: AtomicU64::new(0),
            export_calls: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Hold every fetch open for `delay` so concurrent fetches overlap.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn add_folder(&mut self, parent_id: &str, id: &str, name: &str) {
        self.children
            .entry(parent_id.to_string())
            .or_default()
            .push(RemoteEntry {
                id: id.to_string(),
                name: name.to_string(),
                kind: EntryKind::Folder,
            });
        self.children.entry(id.to_string()).or_default();
    }

    pub fn add_file(&mut self, parent_id: &str, id: &str, name: &str, mime: &str, content: &[u8]) {
        self.add_file_with_behavior(
            parent_id,
            id,
            name,
            mime,
            FileBehavior::Content(content.to_vec()),
        );
    }

    pub fn add_file_with_behavior(
        &mut self,
        parent_id: &str,
        id: &str,
        name: &str,
        mime: &str,
        behavior: FileBehavior,
    ) {
        self.children
            .entry(parent_id.to_string())
            .or_default()
            .push(RemoteEntry {
                id: id.to_string(),
                name: name.to_string(),
                kind: EntryKind::from_mime(mime),
            });
        self.files.insert(id.to_string(), behavior);
    }

    /// Make every listing call for `folder_id` fail.
    pub fn fail_listing(&mut self, folder_id: &str) {
        self.failing_folders.insert(folder_id.to_string());
    }

    /// Bytes export_content produces for a given file id.
    pub fn export_bytes(id: &str) -> Vec<u8> {
        format!("%PDF- export of {id}").into_bytes()
    }

    async fn track_in_flight(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

fn chunked(content: &[u8]) -> ByteStream {
    let chunks: Vec<RemoteResult<Bytes>> = content
        .chunks(CHUNK_SIZE)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    stream::iter(chunks).boxed()
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> RemoteResult<ChildPage> {
        if self.failing_folders.contains(folder_id) {
            return Err(RemoteError::Api(format!(
                "listing folder {folder_id} returned 500: injected failure"
            )));
        }

        let entries = self
            .children
            .get(folder_id)
            .ok_or_else(|| RemoteError::Api(format!("no such folder: {folder_id}")))?;

        let offset: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (offset + self.page_size).min(entries.len());
        let next_page_token = (end < entries.len()).then(|| end.to_string());

        Ok(ChildPage {
            entries: entries[offset..end].to_vec(),
            next_page_token,
        })
    }

    async fn fetch_content(&self, file_id: &str) -> RemoteResult<ByteStream> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.track_in_flight().await;

        match self.files.get(file_id) {
            Some(FileBehavior::Content(content)) => Ok(chunked(content)),
            Some(FileBehavior::FailImmediately(msg)) => Err(RemoteError::Network(msg.clone())),
            Some(FileBehavior::FailAfterChunk(partial, msg)) => {
                let items: Vec<RemoteResult<Bytes>> = vec![
                    Ok(Bytes::copy_from_slice(partial)),
                    Err(RemoteError::Network(msg.clone())),
                ];
                Ok(stream::iter(items).boxed())
            }
            None => Err(RemoteError::Api(format!("no such file: {file_id}"))),
        }
    }

    async fn export_content(&self, file_id: &str, _target_mime: &str) -> RemoteResult<ByteStream> {
        self.export_calls.fetch_add(1, Ordering::SeqCst);
        self.track_in_flight().await;

        match self.files.get(file_id) {
            Some(FileBehavior::FailImmediately(msg)) => Err(RemoteError::Network(msg.clone())),
            Some(_) => Ok(chunked(&Self::export_bytes(file_id))),
            None => Err(RemoteError::Api(format!("no such file: {file_id}"))),
        }
    }
}
