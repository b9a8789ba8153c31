//! Report source port
//!
//! Interface to the POS provider: who the users are and which daily reports
//! exist for each. The primary implementation targets a Zettle-style HTTP
//! API, but the trait is provider-agnostic.

use crate::domain::errors::FetchError;
use crate::domain::report::{Report, User};

/// Port trait for listing users and their daily reports
///
/// ## Implementation notes
///
/// - `list_reports` must return reports in a stable order (the provider's
///   listing order); the reconciler and the final plan preserve it.
/// - Transport retry policy belongs to the implementation, not the caller.
#[async_trait::async_trait]
pub trait ReportSource: Send + Sync {
    /// Lists all users visible to the authenticated account
    async fn list_users(&self) -> Result<Vec<User>, FetchError>;

    /// Lists one user's daily reports, in provider order
    async fn list_reports(&self, user: &User) -> Result<Vec<Report>, FetchError>;
}
