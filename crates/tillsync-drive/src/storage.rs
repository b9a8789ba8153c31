//! Storage port implementation over Google Drive
//!
//! Maps Drive DTOs to the core's domain types. IDs returned by the API are
//! validated on the way in; an unparseable ID is a decode error, not a panic.

use tracing::info;

use tillsync_core::domain::{
    FetchError, FileId, FolderEntry, FolderId, StoredFile, UploadAck, UploadError,
};
use tillsync_core::ports::StorageIndex;

use crate::client::{ChildKind, DriveClient};

/// Content type for uploaded report documents
const REPORT_CONTENT_TYPE: &str = "application/pdf";

/// Google Drive implementation of the storage port
pub struct DriveStorage {
    client: DriveClient,
}

impl DriveStorage {
    /// Creates the adapter over a drive client
    pub fn new(client: DriveClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl StorageIndex for DriveStorage {
    async fn list_folders(&self, root: &FolderId) -> Result<Vec<FolderEntry>, FetchError> {
        let children = self
            .client
            .list_children(root.as_str(), ChildKind::Folders)
            .await?;

        children
            .into_iter()
            .map(|f| {
                let id = FolderId::new(f.id)
                    .map_err(|e| FetchError::Decode(format!("invalid folder ID: {e}")))?;
                Ok(FolderEntry::new(f.name, id))
            })
            .collect()
    }

    async fn list_files(&self, folder: &FolderId) -> Result<Vec<StoredFile>, FetchError> {
        let children = self
            .client
            .list_children(folder.as_str(), ChildKind::Files)
            .await?;

        children
            .into_iter()
            .map(|f| {
                let id = FileId::new(f.id)
                    .map_err(|e| FetchError::Decode(format!("invalid file ID: {e}")))?;
                Ok(StoredFile::new(f.name, id))
            })
            .collect()
    }

    async fn upload(
        &self,
        folder: &FolderId,
        name: &str,
        content: &[u8],
    ) -> Result<UploadAck, UploadError> {
        let uploaded = self
            .client
            .upload_multipart(folder.as_str(), name, REPORT_CONTENT_TYPE, content)
            .await?;

        let file_id = FileId::new(uploaded.id)
            .map_err(|e| UploadError::Decode(format!("invalid file ID in upload response: {e}")))?;

        info!(folder = %folder, name, size = content.len(), "Uploaded document to drive");

        Ok(UploadAck {
            file_id,
            name: uploaded.name,
        })
    }
}
