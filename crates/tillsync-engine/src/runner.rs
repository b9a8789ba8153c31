//! Sync runner - one end-to-end reconciliation run
//!
//! ## Run flow
//!
//! 1. **Index**: list the root's child folders, build the name index
//! 2. **Scan** (bounded concurrency across users): list reports, list the
//!    user's folder contents, reconcile, aggregate into one missing plan
//! 3. **Fast path**: an empty plan ends the run with zero side effects
//! 4. **Execute** (bounded concurrency across items): render, then upload
//!    into the destination folder; items with no destination are skipped
//!    and reported
//!
//! Worker tasks each own one result slot; slots are merged in input order
//! after all tasks finish, so output order is stable regardless of task
//! interleaving. Cancellation is checked between tasks only; an in-flight
//! render+upload pair always runs to completion.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tillsync_core::config::RunConfig;
use tillsync_core::domain::{ConsistencyError, FetchError, FolderId, MissingReport};
use tillsync_core::domain::report::User;
use tillsync_core::identity;
use tillsync_core::index::FolderIndex;
use tillsync_core::ports::{DocumentGenerator, ReportSource, StorageIndex};
use tillsync_core::reconcile;

use crate::outcome::{ItemOutcome, ItemStatus, SyncPlan, SyncResult, UserScan};

/// A run-fatal error
///
/// Everything else (per-user listing failures, per-item render/upload
/// failures) is isolated into the result instead of raised here.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The provider's user listing failed; there is nothing to scan
    #[error("failed to list users: {0}")]
    ListUsers(#[source] FetchError),

    /// The root folder listing failed; no destination can be resolved
    #[error("failed to list storage folders: {0}")]
    ListFolders(#[source] FetchError),

    /// The identity invariant is broken; continuing would corrupt the plan
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

/// Orchestrates scan and execute phases over the port traits
pub struct SyncRunner {
    reports: Arc<dyn ReportSource>,
    storage: Arc<dyn StorageIndex>,
    generator: Arc<dyn DocumentGenerator>,
    root: FolderId,
    options: RunConfig,
    cancel: CancellationToken,
}

impl SyncRunner {
    /// Creates a runner over the given adapters
    ///
    /// # Arguments
    /// * `reports` - POS provider listing port
    /// * `storage` - drive tree port
    /// * `generator` - document rendering port
    /// * `root` - the folder whose children are the per-user folders
    /// * `options` - concurrency bounds for the two phases
    pub fn new(
        reports: Arc<dyn ReportSource>,
        storage: Arc<dyn StorageIndex>,
        generator: Arc<dyn DocumentGenerator>,
        root: FolderId,
        options: RunConfig,
    ) -> Self {
        Self {
            reports,
            storage,
            generator,
            root,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Attaches an external cancellation token (operator abort)
    ///
    /// Cancellation takes effect between tasks; in-flight work finishes.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs the scan phase only: index, list, reconcile, aggregate
    ///
    /// Used directly for dry runs; [`run`](Self::run) calls it first.
    ///
    /// # Errors
    /// Fails on run-global listing errors or an identity-invariant violation.
    #[tracing::instrument(skip(self))]
    pub async fn scan(&self) -> Result<SyncPlan, SyncError> {
        let folders = self
            .storage
            .list_folders(&self.root)
            .await
            .map_err(SyncError::ListFolders)?;
        let index = Arc::new(FolderIndex::from_entries(folders));

        let users = self
            .reports
            .list_users()
            .await
            .map_err(SyncError::ListUsers)?;

        info!(
            users = users.len(),
            folders = index.len(),
            duplicate_folders = index.duplicates().len(),
            "Scanning users against storage"
        );

        let semaphore = Arc::new(Semaphore::new(self.options.scan_concurrency));
        let mut join_set = JoinSet::new();
        let mut slots: Vec<Option<Result<(UserScan, Vec<MissingReport>), ConsistencyError>>> =
            (0..users.len()).map(|_| None).collect();

        for (idx, user) in users.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("Cancellation requested; not scanning remaining users");
                break;
            }

            let reports = Arc::clone(&self.reports);
            let storage = Arc::clone(&self.storage);
            let index = Arc::clone(&index);
            let semaphore = Arc::clone(&semaphore);
            let cancel = self.cancel.clone();

            join_set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (idx, None);
                };
                if cancel.is_cancelled() {
                    return (idx, None);
                }
                (idx, Some(scan_user(reports, storage, index, user).await))
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, payload)) => slots[idx] = payload,
                Err(err) => warn!(error = %err, "Scan task failed to complete"),
            }
        }

        let mut plan = SyncPlan {
            scans: Vec::new(),
            missing: Vec::new(),
            duplicate_folders: index.duplicates().to_vec(),
        };

        for slot in slots.into_iter().flatten() {
            let (scan, missing) = slot?;
            plan.scans.push(scan);
            plan.missing.extend(missing);
        }

        info!(
            users_scanned = plan.users_scanned(),
            reports_scanned = plan.reports_scanned(),
            missing = plan.missing.len(),
            "Scan phase complete"
        );

        Ok(plan)
    }

    /// Runs a full sync: scan, then generate and upload every missing item
    ///
    /// # Errors
    /// Fails only on run-global listing errors or an identity-invariant
    /// violation; everything else lands in the returned [`SyncResult`].
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<SyncResult, SyncError> {
        let start = Instant::now();

        let plan = self.scan().await?;

        // Explicit fast path: the expected steady state. Distinct from
        // "found work and fixed it" in the returned status.
        if plan.missing.is_empty() {
            info!("Storage is up to date; nothing to do");
            return Ok(SyncResult {
                plan,
                outcomes: Vec::new(),
                cancelled: self.cancel.is_cancelled(),
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        info!(missing = plan.missing.len(), "Executing sync plan");
        let outcomes = self.execute(&plan).await;

        let result = SyncResult {
            cancelled: self.cancel.is_cancelled() || outcomes.len() < plan.missing.len(),
            plan,
            outcomes,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            uploaded = result.uploaded(),
            skipped = result.skipped(),
            failed = result.failed(),
            cancelled = result.cancelled,
            duration_ms = result.duration_ms,
            "Sync run complete"
        );

        Ok(result)
    }

    /// Executes the plan's missing items with bounded concurrency
    ///
    /// Every attempted item yields exactly one outcome; items not attempted
    /// because of cancellation yield none (the caller flags the run as
    /// cancelled from the count difference).
    async fn execute(&self, plan: &SyncPlan) -> Vec<ItemOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.options.upload_concurrency));
        let mut join_set = JoinSet::new();
        let mut slots: Vec<Option<ItemOutcome>> = (0..plan.missing.len()).map(|_| None).collect();

        for (idx, item) in plan.missing.iter().cloned().enumerate() {
            if self.cancel.is_cancelled() {
                info!("Cancellation requested; not attempting remaining items");
                break;
            }

            let generator = Arc::clone(&self.generator);
            let storage = Arc::clone(&self.storage);
            let semaphore = Arc::clone(&semaphore);
            let cancel = self.cancel.clone();

            join_set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (idx, None);
                };
                if cancel.is_cancelled() {
                    return (idx, None);
                }
                (idx, Some(execute_item(generator, storage, item).await))
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, payload)) => slots[idx] = payload,
                Err(err) => warn!(error = %err, "Item task failed to complete"),
            }
        }

        slots.into_iter().flatten().collect()
    }
}

/// Scans one user: list reports, list the folder's files once, reconcile
///
/// Listing failures abort this user only and are recorded on the scan
/// record. Only a [`ConsistencyError`] propagates.
async fn scan_user(
    reports_port: Arc<dyn ReportSource>,
    storage: Arc<dyn StorageIndex>,
    index: Arc<FolderIndex>,
    user: User,
) -> Result<(UserScan, Vec<MissingReport>), ConsistencyError> {
    let reports = match reports_port.list_reports(&user).await {
        Ok(reports) => reports,
        Err(err) => {
            warn!(user = %user.name(), error = %err, "Report listing failed; skipping user");
            return Ok((
                UserScan {
                    user: user.name().to_string(),
                    reports_seen: 0,
                    missing: 0,
                    error: Some(err),
                },
                Vec::new(),
            ));
        }
    };

    let folder = index.folder_for(user.name().as_str()).cloned();

    // Single read per folder; the reconciler only compares identities.
    let stored = match &folder {
        Some(folder_id) => match storage.list_files(folder_id).await {
            Ok(files) => files,
            Err(err) => {
                warn!(user = %user.name(), folder = %folder_id, error = %err,
                    "Folder listing failed; skipping user");
                return Ok((
                    UserScan {
                        user: user.name().to_string(),
                        reports_seen: reports.len(),
                        missing: 0,
                        error: Some(err),
                    },
                    Vec::new(),
                ));
            }
        },
        None => Vec::new(),
    };

    let missing = reconcile::find_missing(&user, &reports, folder.as_ref(), &stored)?;

    debug!(
        user = %user.name(),
        reports = reports.len(),
        missing = missing.len(),
        has_folder = folder.is_some(),
        "User scanned"
    );

    Ok((
        UserScan {
            user: user.name().to_string(),
            reports_seen: reports.len(),
            missing: missing.len(),
            error: None,
        },
        missing,
    ))
}

/// Generates and uploads one missing item
///
/// Generation never needs a folder; upload does. The item's failure stays
/// inside its outcome.
async fn execute_item(
    generator: Arc<dyn DocumentGenerator>,
    storage: Arc<dyn StorageIndex>,
    item: MissingReport,
) -> ItemOutcome {
    let path = identity::storage_path(item.report());
    debug!(%path, "Generating missing report document");

    let document = match generator.render(item.report()).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(%path, error = %err, "Document generation failed");
            return ItemOutcome::new(&item, ItemStatus::RenderFailed(err));
        }
    };

    let Some(folder) = item.destination() else {
        info!(%path, "No destination folder for user; upload skipped");
        return ItemOutcome::new(&item, ItemStatus::SkippedNoFolder);
    };

    match storage.upload(folder, &path.file, &document).await {
        Ok(ack) => {
            info!(%path, file_id = %ack.file_id, "Uploaded missing report");
            ItemOutcome::new(&item, ItemStatus::Uploaded { file: ack.file_id })
        }
        Err(err) => {
            warn!(%path, error = %err, "Upload failed");
            ItemOutcome::new(&item, ItemStatus::UploadFailed(err))
        }
    }
}
