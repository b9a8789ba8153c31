//! Domain and port error types
//!
//! The error taxonomy separates the four failure classes that matter to a
//! sync run: fetching remote listings, rendering a document, uploading a
//! document, and internal identity-invariant violations. The engine decides
//! per class whether a failure aborts one user, one item, or the whole run.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur when constructing domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid user display name
    #[error("Invalid user name: {0}")]
    InvalidUserName(String),

    /// Invalid identifier format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}

/// A remote listing failed (users, reports, folders, or files)
///
/// Raised by the `ReportSource` and `StorageIndex` ports. During the scan
/// phase this aborts the affected user only; when it hits the run-global
/// listings (users, folder index) it aborts the run.
#[derive(Debug, Error, Clone)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("network error: {0}")]
    Network(String),

    /// The remote service answered with a non-success status
    #[error("remote service returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The response arrived but could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
}

/// Document generation failed for one report
#[derive(Debug, Error, Clone)]
pub enum RenderError {
    /// Transport-level failure while fetching the rendered document
    #[error("network error: {0}")]
    Network(String),

    /// The provider refused or failed to render the report
    #[error("render service returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The provider returned an empty or unusable document
    #[error("rendered document is invalid: {0}")]
    InvalidDocument(String),
}

/// A document write failed for one item
#[derive(Debug, Error, Clone)]
pub enum UploadError {
    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// The storage service rejected the write
    #[error("storage service returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The storage service acknowledged the write but the response could not
    /// be decoded into a file identity
    #[error("decode error: {0}")]
    Decode(String),
}

/// The identity invariant is broken: two distinct reports for one user
/// canonicalize to the same filename
///
/// This should be impossible (report dates are unique per user) and signals a
/// data-model violation upstream. It is fatal to the run: continuing would
/// corrupt the missing-set computation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "duplicate canonical filename '{name}' for user '{user}': reports dated {first} and {second}"
)]
pub struct ConsistencyError {
    /// Display name of the affected user
    pub user: String,
    /// The colliding canonical filename
    pub name: String,
    /// Date of the report that first produced the name
    pub first: NaiveDate,
    /// Date of the report that collided with it
    pub second: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Api {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "remote service returned 503: Service Unavailable"
        );
    }

    #[test]
    fn test_consistency_error_display() {
        let err = ConsistencyError {
            user: "Alice".to_string(),
            name: "2024-01-05-alice.pdf".to_string(),
            first: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            second: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Alice"));
        assert!(msg.contains("2024-01-05-alice.pdf"));
    }

    #[test]
    fn test_domain_error_equality() {
        let a = DomainError::InvalidId("x".to_string());
        let b = DomainError::InvalidId("x".to_string());
        assert_eq!(a, b);
    }
}
