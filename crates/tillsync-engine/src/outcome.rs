//! Run results: per-user scans, per-item outcomes, and the overall summary
//!
//! One outcome slot per task, merged after the tasks complete; the engine
//! never mutates a shared counter from concurrent workers. The summary keeps
//! three states apart that operators need to distinguish: "up to date"
//! (nothing was missing), "synced" (missing items were all fixed), and
//! "degraded" (something failed or was skipped).

use chrono::NaiveDate;

use tillsync_core::domain::{FetchError, FileId, MissingReport, RenderError, UploadError};
use tillsync_core::identity;
use tillsync_core::index::DuplicateFolderName;

/// Result of scanning one user
#[derive(Debug, Clone)]
pub struct UserScan {
    /// The user's display name
    pub user: String,
    /// Number of reports the provider listed for this user
    pub reports_seen: usize,
    /// Number of reports found missing from storage
    pub missing: usize,
    /// The listing failure that aborted this user's scan, if any
    pub error: Option<FetchError>,
}

impl UserScan {
    /// Whether this user's scan was aborted by a listing failure
    #[must_use]
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// The aggregated plan produced by the scan phase
///
/// Holds every per-user scan record plus the run-wide missing list, in scan
/// order. Consumed by the execute phase or returned as-is for a dry run.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Per-user scan records, in user listing order
    pub scans: Vec<UserScan>,
    /// All missing reports across users, in scan order
    pub missing: Vec<MissingReport>,
    /// Folder-name collisions observed while building the directory index
    pub duplicate_folders: Vec<DuplicateFolderName>,
}

impl SyncPlan {
    /// Number of users scanned (including failed scans)
    #[must_use]
    pub fn users_scanned(&self) -> usize {
        self.scans.len()
    }

    /// Total reports listed across all successfully scanned users
    #[must_use]
    pub fn reports_scanned(&self) -> usize {
        self.scans.iter().map(|s| s.reports_seen).sum()
    }

    /// Whether any user's scan was aborted by a listing failure
    #[must_use]
    pub fn has_scan_failures(&self) -> bool {
        self.scans.iter().any(UserScan::failed)
    }
}

/// What happened to one missing item during the execute phase
#[derive(Debug, Clone)]
pub enum ItemStatus {
    /// Document generated and stored
    Uploaded {
        /// Identity the drive assigned to the new file
        file: FileId,
    },
    /// Document generation failed; nothing was uploaded
    RenderFailed(RenderError),
    /// Document generated but the write failed
    UploadFailed(UploadError),
    /// Document generated but there is no folder to upload into
    SkippedNoFolder,
}

/// Outcome of one missing item
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    /// The user the report belongs to
    pub user: String,
    /// The report's day
    pub date: NaiveDate,
    /// The canonical filename the document belongs under
    pub name: String,
    /// What happened
    pub status: ItemStatus,
}

impl ItemOutcome {
    pub(crate) fn new(item: &MissingReport, status: ItemStatus) -> Self {
        Self {
            user: item.report().user().name().to_string(),
            date: item.report().date(),
            name: identity::canonical_file_name(item.report()),
            status,
        }
    }

    /// Whether this item failed (render or upload error)
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            ItemStatus::RenderFailed(_) | ItemStatus::UploadFailed(_)
        )
    }
}

/// Overall state of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Nothing was missing; zero side effects
    UpToDate,
    /// Missing documents were found and all were uploaded
    Synced,
    /// At least one scan failed, item failed, item was skipped for lack of
    /// a folder, or the run was cancelled
    Degraded,
}

/// Summary of one completed sync run
#[derive(Debug, Clone)]
pub struct SyncResult {
    /// The scan-phase plan (per-user records, duplicate-folder warnings)
    pub plan: SyncPlan,
    /// Per-item outcomes, in plan order
    pub outcomes: Vec<ItemOutcome>,
    /// Whether the run was cancelled before every item was attempted
    pub cancelled: bool,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

impl SyncResult {
    /// Total number of missing reports found by the scan
    #[must_use]
    pub fn missing_found(&self) -> usize {
        self.plan.missing.len()
    }

    /// Number of items uploaded successfully
    #[must_use]
    pub fn uploaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ItemStatus::Uploaded { .. }))
            .count()
    }

    /// Number of items skipped because the user has no folder
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ItemStatus::SkippedNoFolder))
            .count()
    }

    /// Number of items that failed (render or upload)
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// The overall run state
    ///
    /// "Up to date" is its own success state: the expected steady state of a
    /// scheduled sync, reported distinctly from "found work and did it".
    #[must_use]
    pub fn status(&self) -> RunStatus {
        let degraded = self.cancelled
            || self.plan.has_scan_failures()
            || self
                .outcomes
                .iter()
                .any(|o| o.is_failure() || matches!(o.status, ItemStatus::SkippedNoFolder));

        if degraded {
            RunStatus::Degraded
        } else if self.plan.missing.is_empty() {
            RunStatus::UpToDate
        } else {
            RunStatus::Synced
        }
    }

    /// True iff nothing failed, nothing was skipped, and nothing was cancelled
    #[must_use]
    pub fn success(&self) -> bool {
        self.status() != RunStatus::Degraded
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use tillsync_core::domain::newtypes::{FolderId, UserId, UserName};
    use tillsync_core::domain::report::{Report, User};

    fn missing(user: &str, day: u32, folder: Option<&str>) -> MissingReport {
        let report = Report::new(
            User::new(UserName::new(user).unwrap(), UserId::new("u1").unwrap()),
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            serde_json::Value::Null,
        );
        MissingReport::new(report, folder.map(|f| FolderId::new(f).unwrap()))
    }

    fn scan(user: &str, seen: usize, missing: usize, error: Option<FetchError>) -> UserScan {
        UserScan {
            user: user.to_string(),
            reports_seen: seen,
            missing,
            error,
        }
    }

    fn result(plan: SyncPlan, outcomes: Vec<ItemOutcome>) -> SyncResult {
        SyncResult {
            plan,
            outcomes,
            cancelled: false,
            duration_ms: 0,
        }
    }

    #[test]
    fn test_up_to_date_when_nothing_missing() {
        let plan = SyncPlan {
            scans: vec![scan("Alice", 3, 0, None)],
            missing: vec![],
            duplicate_folders: vec![],
        };
        let r = result(plan, vec![]);

        assert_eq!(r.status(), RunStatus::UpToDate);
        assert!(r.success());
    }

    #[test]
    fn test_synced_when_all_uploaded() {
        let item = missing("Alice", 2, Some("f1"));
        let plan = SyncPlan {
            scans: vec![scan("Alice", 2, 1, None)],
            missing: vec![item.clone()],
            duplicate_folders: vec![],
        };
        let outcome = ItemOutcome::new(
            &item,
            ItemStatus::Uploaded {
                file: FileId::new("x1").unwrap(),
            },
        );
        let r = result(plan, vec![outcome]);

        assert_eq!(r.status(), RunStatus::Synced);
        assert!(r.success());
        assert_eq!(r.uploaded(), 1);
    }

    #[test]
    fn test_degraded_on_item_failure() {
        let item = missing("Alice", 2, Some("f1"));
        let plan = SyncPlan {
            scans: vec![scan("Alice", 2, 1, None)],
            missing: vec![item.clone()],
            duplicate_folders: vec![],
        };
        let outcome = ItemOutcome::new(
            &item,
            ItemStatus::UploadFailed(UploadError::Network("reset".to_string())),
        );
        let r = result(plan, vec![outcome]);

        assert_eq!(r.status(), RunStatus::Degraded);
        assert!(!r.success());
        assert_eq!(r.failed(), 1);
    }

    #[test]
    fn test_skipped_no_folder_denies_success() {
        let item = missing("Alice", 2, None);
        let plan = SyncPlan {
            scans: vec![scan("Alice", 2, 1, None)],
            missing: vec![item.clone()],
            duplicate_folders: vec![],
        };
        let outcome = ItemOutcome::new(&item, ItemStatus::SkippedNoFolder);
        let r = result(plan, vec![outcome]);

        assert_eq!(r.status(), RunStatus::Degraded);
        assert!(!r.success());
        assert_eq!(r.skipped(), 1);
        assert_eq!(r.failed(), 0);
    }

    #[test]
    fn test_degraded_on_scan_failure() {
        let plan = SyncPlan {
            scans: vec![
                scan("Alice", 2, 0, None),
                scan(
                    "Bob",
                    0,
                    0,
                    Some(FetchError::Network("timeout".to_string())),
                ),
            ],
            missing: vec![],
            duplicate_folders: vec![],
        };
        let r = result(plan, vec![]);

        assert_eq!(r.status(), RunStatus::Degraded);
        assert!(!r.success());
    }

    #[test]
    fn test_degraded_when_cancelled() {
        let plan = SyncPlan {
            scans: vec![scan("Alice", 2, 1, None)],
            missing: vec![missing("Alice", 2, Some("f1"))],
            duplicate_folders: vec![],
        };
        let mut r = result(plan, vec![]);
        r.cancelled = true;

        assert_eq!(r.status(), RunStatus::Degraded);
    }

    #[test]
    fn test_plan_counts() {
        let plan = SyncPlan {
            scans: vec![scan("Alice", 2, 1, None), scan("Bob", 3, 0, None)],
            missing: vec![missing("Alice", 2, Some("f1"))],
            duplicate_folders: vec![],
        };

        assert_eq!(plan.users_scanned(), 2);
        assert_eq!(plan.reports_scanned(), 5);
        assert!(!plan.has_scan_failures());
    }

    #[test]
    fn test_item_outcome_carries_canonical_name() {
        let item = missing("Alice", 5, Some("f1"));
        let outcome = ItemOutcome::new(&item, ItemStatus::SkippedNoFolder);

        assert_eq!(outcome.user, "Alice");
        assert_eq!(outcome.name, "2024-01-05-alice.pdf");
    }
}
