//! Identity model: canonical filename derivation
//!
//! Maps a (user, date) report identity to the one filename it may be stored
//! under. The mapping is a pure function and must stay stable across runs:
//! re-running the sync against an unchanged drive must find every previously
//! uploaded document under the name it expects. Files live directly in the
//! per-user folder, so the date is encoded in the filename rather than in a
//! physical subfolder.

use std::fmt::{self, Display, Formatter};

use crate::domain::report::Report;

/// File extension for generated report documents
const REPORT_EXTENSION: &str = "pdf";

/// Computes the canonical filename for a report
///
/// Deterministic and collision-free within one user's report set: the date
/// is unique per user and formatted to a fixed width, and the user slug
/// depends only on the user. Example: `2024-01-05-cafe-nord.pdf`.
#[must_use]
pub fn canonical_file_name(report: &Report) -> String {
    format!(
        "{}-{}.{}",
        report.date().format("%Y-%m-%d"),
        user_slug(report.user().name().as_str()),
        REPORT_EXTENSION
    )
}

/// Three-level logical address of a report document
///
/// Used for logging and progress output. Only the user segment maps to a
/// physical folder; date and file are encoded in the filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    /// The user segment (folder name)
    pub user: String,
    /// The date segment
    pub date: String,
    /// The file segment (canonical filename)
    pub file: String,
}

impl Display for StoragePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.user, self.date, self.file)
    }
}

/// Computes the logical storage path for a report
#[must_use]
pub fn storage_path(report: &Report) -> StoragePath {
    StoragePath {
        user: report.user().name().to_string(),
        date: report.date().format("%Y-%m-%d").to_string(),
        file: canonical_file_name(report),
    }
}

/// Stable filesystem-safe slug of a user display name
///
/// Lowercases, collapses whitespace runs to a single `-`, and drops anything
/// that is not alphanumeric, `-`, or `_`. The result only depends on the
/// input, never on run state.
fn user_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_whitespace() {
            pending_separator = !slug.is_empty();
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            if pending_separator {
                slug.push('-');
                pending_separator = false;
            }
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        }
        // Anything else (slashes, quotes, control chars) is dropped.
    }

    slug
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::newtypes::{UserId, UserName};
    use crate::domain::report::User;

    fn report(name: &str, date: (i32, u32, u32)) -> Report {
        Report::new(
            User::new(UserName::new(name).unwrap(), UserId::new("u1").unwrap()),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            serde_json::Value::Null,
        )
    }

    #[test]
    fn test_canonical_file_name() {
        let r = report("Alice", (2024, 1, 5));
        assert_eq!(canonical_file_name(&r), "2024-01-05-alice.pdf");
    }

    #[test]
    fn test_deterministic_across_calls() {
        let r = report("Cafe Nord", (2024, 3, 17));
        assert_eq!(canonical_file_name(&r), canonical_file_name(&r));
    }

    #[test]
    fn test_distinct_dates_distinct_names() {
        let a = report("Alice", (2024, 1, 1));
        let b = report("Alice", (2024, 1, 2));
        assert_ne!(canonical_file_name(&a), canonical_file_name(&b));
    }

    #[test]
    fn test_slug_collapses_whitespace() {
        let r = report("Cafe   Nord", (2024, 1, 5));
        assert_eq!(canonical_file_name(&r), "2024-01-05-cafe-nord.pdf");
    }

    #[test]
    fn test_slug_drops_hostile_characters() {
        let r = report("A/B:C*D", (2024, 1, 5));
        assert_eq!(canonical_file_name(&r), "2024-01-05-abcd.pdf");
    }

    #[test]
    fn test_date_is_zero_padded() {
        let r = report("Alice", (2024, 2, 3));
        assert!(canonical_file_name(&r).starts_with("2024-02-03"));
    }

    #[test]
    fn test_storage_path_display() {
        let r = report("Alice", (2024, 1, 5));
        let path = storage_path(&r);
        assert_eq!(path.to_string(), "Alice/2024-01-05/2024-01-05-alice.pdf");
    }

    #[test]
    fn test_storage_path_file_matches_canonical_name() {
        let r = report("Cafe Nord", (2024, 1, 5));
        assert_eq!(storage_path(&r).file, canonical_file_name(&r));
    }
}
