//! Google Drive v3 API client
//!
//! Typed HTTP client for the two Drive endpoints Tillsync needs: child
//! listing (with `q` filters and `pageToken` pagination) and multipart
//! upload. Base URLs are overridable so tests can point at a mock server.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;

use tillsync_core::domain::{FetchError, UploadError};

/// Base URL for Drive v3 metadata requests
const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Base URL for Drive v3 upload requests
const UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// MIME type Drive assigns to folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Page size for listing requests (Drive's maximum)
const LIST_PAGE_SIZE: u32 = 1000;

/// Boundary for multipart/related upload bodies
const UPLOAD_BOUNDARY: &str = "tillsync_upload_4cc1d2";

// ============================================================================
// Drive API response types
// ============================================================================

/// One file or folder from a Drive listing or upload response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// Drive-assigned item ID
    pub id: String,
    /// Display name
    pub name: String,
    /// MIME type; folders carry [`FOLDER_MIME_TYPE`]
    pub mime_type: Option<String>,
}

/// Response page from the files listing endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListResponse {
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Which children of a folder to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    /// Only child folders
    Folders,
    /// Only non-folder files
    Files,
}

// ============================================================================
// DriveClient
// ============================================================================

/// HTTP client for Google Drive v3 calls
pub struct DriveClient {
    client: Client,
    base_url: String,
    upload_base_url: String,
    access_token: String,
}

impl DriveClient {
    /// Creates a client with the given access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DRIVE_BASE_URL.to_string(),
            upload_base_url: UPLOAD_BASE_URL.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Creates a client with custom base URLs (useful for testing)
    pub fn with_base_urls(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            upload_base_url: upload_base_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Updates the access token (e.g., after a refresh)
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = token.into();
        debug!("Updated DriveClient access token");
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.access_token)
    }

    /// Lists all children of a folder, following pagination to the end
    ///
    /// A truncated listing would make satisfied reports look missing, so
    /// every page is fetched before returning.
    pub async fn list_children(
        &self,
        parent_id: &str,
        kind: ChildKind,
    ) -> Result<Vec<DriveFile>, FetchError> {
        let mime_clause = match kind {
            ChildKind::Folders => format!(" and mimeType = '{FOLDER_MIME_TYPE}'"),
            ChildKind::Files => format!(" and mimeType != '{FOLDER_MIME_TYPE}'"),
        };
        let query = format!("'{parent_id}' in parents and trashed = false{mime_clause}");
        let page_size = LIST_PAGE_SIZE.to_string();

        let mut all_files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::GET, format!("{}/files", self.base_url))
                .query(&[
                    ("q", query.as_str()),
                    ("fields", "nextPageToken,files(id,name,mimeType)"),
                    ("pageSize", page_size.as_str()),
                ]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            let response = check_status(response).await?;

            let page: FileListResponse = response
                .json()
                .await
                .map_err(|e| FetchError::Decode(e.to_string()))?;

            all_files.extend(page.files);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            parent = parent_id,
            kind = ?kind,
            count = all_files.len(),
            "Listed drive children"
        );

        Ok(all_files)
    }

    /// Uploads a file via the multipart endpoint
    ///
    /// Sends a `multipart/related` body: a JSON metadata part naming the
    /// file and its parent folder, followed by the content bytes.
    pub async fn upload_multipart(
        &self,
        parent_id: &str,
        name: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<DriveFile, UploadError> {
        let metadata = serde_json::json!({
            "name": name,
            "parents": [parent_id],
        });

        let mut body = format!(
            "--{UPLOAD_BOUNDARY}\r\n\
             Content-Type: application/json; charset=UTF-8\r\n\r\n\
             {metadata}\r\n\
             --{UPLOAD_BOUNDARY}\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}--").as_bytes());

        let response = self
            .request(
                Method::POST,
                format!("{}/files?uploadType=multipart", self.upload_base_url),
            )
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={UPLOAD_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| UploadError::Decode(e.to_string()))
    }
}

/// Maps a non-success response to a typed fetch error
async fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(FetchError::Api {
        status: status.as_u16(),
        message,
    })
}
