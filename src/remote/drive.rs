//! Google Drive v3 REST client
//!
//! Implements [`RemoteStore`] against the Drive `files` API:
//! - `files.list` with a parent query for folder listings (paginated)
//! - `files.get` with `alt=media` for byte-for-byte downloads
//! - `files.export` for Google-native documents
//!
//! Authentication is external: the client is handed a ready-to-use OAuth
//! access token and attaches it as a bearer header. Token acquisition and
//! refresh are out of scope.

use crate::config::LIST_PAGE_SIZE;
use crate::remote::{
    ByteStream, ChildPage, EntryKind, RemoteEntry, RemoteError, RemoteResult, RemoteStore,
};
use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Production Drive API endpoint.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com";

/// `files.list` response body.
#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(rename = "nextPageToken", default)]
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// One `files` resource, restricted to the fields we request.
#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
}

impl From<DriveFile> for RemoteEntry {
    fn from(file: DriveFile) -> Self {
        let kind = EntryKind::from_mime(&file.mime_type);
        RemoteEntry {
            id: file.id,
            name: file.name,
            kind,
        }
    }
}

/// HTTP client for the Google Drive v3 API.
pub struct DriveClient {
    client: Client,
    base_url: String,
    access_token: String,
    page_size: usize,
}

impl DriveClient {
    /// Create a new client from a ready-to-use OAuth access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DRIVE_API_BASE.to_string(),
            access_token: access_token.into(),
            page_size: LIST_PAGE_SIZE,
        }
    }

    /// Override the API base URL (for tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the listing page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Execute a GET request and stream the response body on success.
    async fn get_stream(&self, url: String, query: &[(&str, String)]) -> RemoteResult<ByteStream> {
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(format!(
                "GET {url} returned {status}: {body}"
            )));
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| RemoteError::Network(e.to_string()))
            .boxed();
        Ok(stream)
    }
}

#[async_trait]
impl RemoteStore for DriveClient {
    async fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> RemoteResult<ChildPage> {
        let url = format!("{}/drive/v3/files", self.base_url);
        let query = format!("'{folder_id}' in parents and trashed = false");

        let mut params = vec![
            ("q", query),
            ("spaces", "drive".to_string()),
            (
                "fields",
                "nextPageToken, files(id, name, mimeType)".to_string(),
            ),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        debug!(folder_id, page_token, "Listing folder children");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&params)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(format!(
                "listing folder {folder_id} returned {status}: {body}"
            )));
        }

        let list: FileList = response
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        debug!(
            folder_id,
            entries = list.files.len(),
            has_next = list.next_page_token.is_some(),
            "Listing page received"
        );

        Ok(ChildPage {
            entries: list.files.into_iter().map(RemoteEntry::from).collect(),
            next_page_token: list.next_page_token,
        })
    }

    async fn fetch_content(&self, file_id: &str) -> RemoteResult<ByteStream> {
        let url = format!("{}/drive/v3/files/{file_id}", self.base_url);
        debug!(file_id, "Fetching file content");
        self.get_stream(url, &[("alt", "media".to_string())]).await
    }

    async fn export_content(&self, file_id: &str, target_mime: &str) -> RemoteResult<ByteStream> {
        let url = format!("{}/drive/v3/files/{file_id}/export", self.base_url);
        debug!(file_id, target_mime, "Exporting document");
        self.get_stream(url, &[("mimeType", target_mime.to_string())])
            .await
    }
}
