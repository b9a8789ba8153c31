//! Storage-side types mirroring the drive tree
//!
//! These are thin views over what the storage listing returns. Folder
//! membership is the only structure the core cares about: a stored file
//! satisfies a report iff its name matches the report's canonical filename
//! inside the right user's folder.

use serde::{Deserialize, Serialize};

use super::newtypes::{FileId, FolderId};

/// One entry from the root folder listing: a named child folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    /// The folder's display name (matched against user names)
    pub name: String,
    /// The drive-assigned folder identity
    pub id: FolderId,
}

impl FolderEntry {
    /// Creates a folder entry
    pub fn new(name: impl Into<String>, id: FolderId) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// An existing file inside a storage folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// The file's name as stored
    pub name: String,
    /// The drive-assigned file identity
    pub id: FileId,
}

impl StoredFile {
    /// Creates a stored-file view
    pub fn new(name: impl Into<String>, id: FileId) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Acknowledgement returned by a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAck {
    /// Identity the drive assigned to the new file
    pub file_id: FileId,
    /// The name the file was stored under
    pub name: String,
}
