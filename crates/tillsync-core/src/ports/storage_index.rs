//! Storage index port
//!
//! Interface to the cloud drive: folder listing, file listing, and document
//! upload. The primary implementation targets Google Drive v3.

use crate::domain::errors::{FetchError, UploadError};
use crate::domain::newtypes::FolderId;
use crate::domain::storage::{FolderEntry, StoredFile, UploadAck};

/// Port trait for the drive tree the reports are stored in
///
/// ## Implementation notes
///
/// - `list_folders` and `list_files` must enumerate the complete child set
///   (following pagination); a truncated listing would make satisfied
///   reports look missing and re-upload them.
/// - `upload` must store the document under exactly the given name inside
///   the given folder.
#[async_trait::async_trait]
pub trait StorageIndex: Send + Sync {
    /// Lists the named child folders of `root`
    async fn list_folders(&self, root: &FolderId) -> Result<Vec<FolderEntry>, FetchError>;

    /// Lists the files inside one folder
    async fn list_files(&self, folder: &FolderId) -> Result<Vec<StoredFile>, FetchError>;

    /// Uploads a document into a folder under the given name
    async fn upload(
        &self,
        folder: &FolderId,
        name: &str,
        content: &[u8],
    ) -> Result<UploadAck, UploadError>;
}
