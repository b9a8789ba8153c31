//! Google Drive adapter for Tillsync
//!
//! Implements the core's [`StorageIndex`](tillsync_core::ports::StorageIndex)
//! port over the Google Drive v3 API:
//! - [`auth`] - OAuth2 authorization-code flow and token refresh
//! - [`client`] - typed HTTP client with listing pagination and multipart
//!   upload
//! - [`storage`] - the port implementation mapping Drive DTOs to domain types

pub mod auth;
pub mod client;
pub mod storage;

pub use auth::{AuthFlow, DriveAuthConfig, PendingAuthorization, Tokens};
pub use client::DriveClient;
pub use storage::DriveStorage;
