//! Domain entities and business logic
//!
//! This module contains the core domain types for Tillsync:
//! - Newtypes for type-safe identifiers and validated domain values
//! - Report and user types fetched from the POS provider
//! - Storage types mirroring the drive tree
//! - The transient missing-report value produced by reconciliation
//! - Domain-specific error types

pub mod errors;
pub mod missing;
pub mod newtypes;
pub mod report;
pub mod storage;

// Re-export commonly used types
pub use errors::{ConsistencyError, DomainError, FetchError, RenderError, UploadError};
pub use missing::MissingReport;
pub use newtypes::{FileId, FolderId, UserId, UserName};
pub use report::{Report, User};
pub use storage::{FolderEntry, StoredFile, UploadAck};
