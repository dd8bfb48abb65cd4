//! Remote store boundary
//!
//! The mirroring engine only talks to the remote hierarchy through the
//! [`RemoteStore`] trait: one paginated listing call plus two streaming
//! content calls. The production implementation is
//! [`drive::DriveClient`]; tests substitute an in-memory store.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;

/// Google Drive v3 client
pub mod drive;

/// MIME type marking a Drive entry as a folder.
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// MIME prefix of Google-native document types that cannot be fetched
/// byte-for-byte and must be exported instead.
pub const GOOGLE_APPS_PREFIX: &str = "application/vnd.google-apps.";

/// Remote store errors
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Network-level failure (timeout, connection reset)
    #[error("network error: {0}")]
    Network(String),

    /// API returned a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// Response could not be parsed
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for remote store operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Streamed file content, delivered in chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = RemoteResult<Bytes>> + Send>>;

/// What kind of remote entry a listing returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A folder; traversed, never downloaded
    Folder,
    /// A leaf file with its content MIME type
    File {
        /// Content MIME type as reported by the listing
        mime_type: String,
    },
}

impl EntryKind {
    /// Build the kind from a listing MIME type.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type == FOLDER_MIME {
            EntryKind::Folder
        } else {
            EntryKind::File {
                mime_type: mime_type.to_string(),
            }
        }
    }

    /// Whether this entry is a Google-native document that must be
    /// exported (as PDF) rather than fetched directly.
    pub fn needs_export(&self) -> bool {
        match self {
            EntryKind::Folder => false,
            EntryKind::File { mime_type } => mime_type.starts_with(GOOGLE_APPS_PREFIX),
        }
    }
}

/// One item returned by a folder listing.
///
/// Constructed fresh per page and consumed immediately by the traversal;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Opaque remote identifier, stable and unique within the store
    pub id: String,
    /// Display name; not guaranteed filesystem-safe or unique among siblings
    pub name: String,
    /// Folder or file tag
    pub kind: EntryKind,
}

/// One page of a folder listing.
#[derive(Debug, Clone, Default)]
pub struct ChildPage {
    /// Immediate children returned in this page, in listing order
    pub entries: Vec<RemoteEntry>,
    /// Continuation token for the next page; `None` on the last page
    pub next_page_token: Option<String>,
}

/// Read-only handle to the remote hierarchy.
///
/// Implementations are expected to be cheap to share behind an `Arc`;
/// every worker job holds a clone while streaming content.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// List one page of a folder's immediate children.
    ///
    /// # Arguments
    /// * `folder_id` - Remote identifier of the folder to list
    /// * `page_token` - Continuation token from the previous page, if any
    async fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> RemoteResult<ChildPage>;

    /// Fetch a file's content byte-for-byte as a chunk stream.
    async fn fetch_content(&self, file_id: &str) -> RemoteResult<ByteStream>;

    /// Export a Google-native document converted to `target_mime`.
    async fn export_content(&self, file_id: &str, target_mime: &str) -> RemoteResult<ByteStream>;
}
