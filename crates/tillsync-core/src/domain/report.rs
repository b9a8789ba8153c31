//! Users and their daily reports
//!
//! Both types are fetched fresh from the POS provider at the start of every
//! sync run and are immutable afterwards. The provider's numeric summary
//! fields travel with the report as an opaque JSON value; the core never
//! inspects them, it only needs the identity key (user name, date).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::newtypes::{UserId, UserName};

/// A POS provider user (one till / sub-account)
///
/// The display name is the join key to the per-user drive folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    name: UserName,
    id: UserId,
}

impl User {
    /// Creates a user from its validated parts
    pub fn new(name: UserName, id: UserId) -> Self {
        Self { name, id }
    }

    /// The user's display name
    #[must_use]
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// The opaque provider-side identifier
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }
}

/// One user's daily sales report
///
/// Identity key is (user name, date); the provider guarantees at most one
/// report per user per day. `summary` carries whatever totals the provider
/// returned, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    user: User,
    date: NaiveDate,
    summary: serde_json::Value,
}

impl Report {
    /// Creates a report for the given user and day
    pub fn new(user: User, date: NaiveDate, summary: serde_json::Value) -> Self {
        Self {
            user,
            date,
            summary,
        }
    }

    /// The user this report belongs to
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The report's day
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The provider's summary payload, opaque to the core
    #[must_use]
    pub fn summary(&self) -> &serde_json::Value {
        &self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User::new(
            UserName::new(name).unwrap(),
            UserId::new("u-1").unwrap(),
        )
    }

    #[test]
    fn test_report_identity_parts() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let report = Report::new(user("Alice"), date, serde_json::json!({"gross": 1250}));

        assert_eq!(report.user().name().as_str(), "Alice");
        assert_eq!(report.date(), date);
        assert_eq!(report.summary()["gross"], 1250);
    }

    #[test]
    fn test_serde_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let report = Report::new(user("Alice"), date, serde_json::json!({"net": 990}));

        let json = serde_json::to_string(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(report, parsed);
    }
}
