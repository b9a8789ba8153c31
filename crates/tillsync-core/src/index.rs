//! Directory index: user name to drive folder lookup
//!
//! Built once per run from the flat listing of the root folder's children.
//! Drive allows two folders with the same display name, which would silently
//! misdirect uploads if we let a map insert decide the winner unnoticed; the
//! index therefore keeps last-wins semantics but records every collision so
//! the driver can warn the operator.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::newtypes::FolderId;
use crate::domain::storage::FolderEntry;

/// A duplicate folder name observed while building the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFolderName {
    /// The shared display name
    pub name: String,
    /// The folder that was displaced
    pub displaced: FolderId,
    /// The folder that won (appeared later in the listing)
    pub kept: FolderId,
}

/// Lookup from user name to storage folder identity
#[derive(Debug, Clone, Default)]
pub struct FolderIndex {
    by_name: HashMap<String, FolderId>,
    duplicates: Vec<DuplicateFolderName>,
}

impl FolderIndex {
    /// Builds the index from an unordered folder listing
    ///
    /// Duplicate names resolve last-wins. Each collision is logged as a
    /// warning and recorded for the caller; it is never an error.
    pub fn from_entries(entries: impl IntoIterator<Item = FolderEntry>) -> Self {
        let mut by_name: HashMap<String, FolderId> = HashMap::new();
        let mut duplicates = Vec::new();

        for entry in entries {
            if let Some(displaced) = by_name.insert(entry.name.clone(), entry.id.clone()) {
                warn!(
                    name = %entry.name,
                    displaced = %displaced,
                    kept = %entry.id,
                    "Duplicate folder name in storage listing; keeping the later entry"
                );
                duplicates.push(DuplicateFolderName {
                    name: entry.name,
                    displaced,
                    kept: entry.id,
                });
            }
        }

        Self {
            by_name,
            duplicates,
        }
    }

    /// Looks up the folder for a user name
    ///
    /// Absence is not an error at this layer; it propagates to the
    /// reconciler as "no destination".
    #[must_use]
    pub fn folder_for(&self, user_name: &str) -> Option<&FolderId> {
        self.by_name.get(user_name)
    }

    /// The collisions observed while building the index
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateFolderName] {
        &self.duplicates
    }

    /// Number of distinct folder names indexed
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the index holds no folders
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, id: &str) -> FolderEntry {
        FolderEntry::new(name, FolderId::new(id).unwrap())
    }

    #[test]
    fn test_lookup_present() {
        let index = FolderIndex::from_entries([entry("Alice", "f1"), entry("Bob", "f2")]);
        assert_eq!(index.folder_for("Alice").unwrap().as_str(), "f1");
        assert_eq!(index.folder_for("Bob").unwrap().as_str(), "f2");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_lookup_absent() {
        let index = FolderIndex::from_entries([entry("Alice", "f1")]);
        assert!(index.folder_for("Carol").is_none());
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let index = FolderIndex::from_entries([
            entry("Alice", "f1"),
            entry("Bob", "f2"),
            entry("Alice", "f3"),
        ]);

        assert_eq!(index.folder_for("Alice").unwrap().as_str(), "f3");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicate_names_surfaced() {
        let index = FolderIndex::from_entries([entry("Alice", "f1"), entry("Alice", "f3")]);

        let dups = index.duplicates();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].name, "Alice");
        assert_eq!(dups[0].displaced.as_str(), "f1");
        assert_eq!(dups[0].kept.as_str(), "f3");
    }

    #[test]
    fn test_empty_listing() {
        let index = FolderIndex::from_entries([]);
        assert!(index.is_empty());
        assert!(index.duplicates().is_empty());
    }
}
