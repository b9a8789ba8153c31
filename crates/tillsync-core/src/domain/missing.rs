//! The transient missing-report value
//!
//! Produced by the reconciler, consumed by the orchestrator within the same
//! run, never persisted.

use serde::{Deserialize, Serialize};

use super::newtypes::FolderId;
use super::report::Report;
use crate::identity;

/// A report with no corresponding stored document
///
/// Pairs the report with the folder it belongs in. `destination` is `None`
/// when no drive folder matches the user's name; such items can still be
/// generated but their upload must be skipped and reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingReport {
    report: Report,
    destination: Option<FolderId>,
}

impl MissingReport {
    /// Creates a missing-report entry
    pub fn new(report: Report, destination: Option<FolderId>) -> Self {
        Self {
            report,
            destination,
        }
    }

    /// The report that lacks a stored document
    #[must_use]
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// The destination folder, absent when the user has no folder
    #[must_use]
    pub fn destination(&self) -> Option<&FolderId> {
        self.destination.as_ref()
    }

    /// Whether an upload destination exists for this item
    #[must_use]
    pub fn has_destination(&self) -> bool {
        self.destination.is_some()
    }

    /// The canonical filename the generated document must be stored under
    #[must_use]
    pub fn canonical_name(&self) -> String {
        identity::canonical_file_name(&self.report)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::newtypes::{UserId, UserName};
    use crate::domain::report::User;

    fn report() -> Report {
        Report::new(
            User::new(UserName::new("Alice").unwrap(), UserId::new("u1").unwrap()),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            serde_json::Value::Null,
        )
    }

    #[test]
    fn test_with_destination() {
        let missing = MissingReport::new(report(), Some(FolderId::new("f1").unwrap()));
        assert!(missing.has_destination());
        assert_eq!(missing.destination().unwrap().as_str(), "f1");
    }

    #[test]
    fn test_without_destination() {
        let missing = MissingReport::new(report(), None);
        assert!(!missing.has_destination());
        assert!(missing.destination().is_none());
    }

    #[test]
    fn test_canonical_name_delegates_to_identity() {
        let missing = MissingReport::new(report(), None);
        assert_eq!(
            missing.canonical_name(),
            identity::canonical_file_name(missing.report())
        );
    }
}
