//! Sync command - run a full reconciliation
//!
//! Loads configuration from the environment, logs in to both services, runs
//! the engine, and reports every outcome. Ctrl-C cancels between tasks;
//! in-flight generate+upload pairs finish first.

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use tillsync_core::config::Config;
use tillsync_engine::{ItemStatus, RunStatus, SyncResult};

use crate::commands;
use crate::output::{OutputFormat, Printer};

#[derive(Debug, Args)]
pub struct SyncCommand {}

impl SyncCommand {
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        let printer = Printer::new(format);

        let config =
            Config::from_env().context("Failed to load configuration from the environment")?;
        printer.success("Configuration loaded");

        let adapters = commands::connect(&config, &printer).await?;

        let cancel = CancellationToken::new();
        let signal_cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received; finishing in-flight items then stopping");
                signal_cancel.cancel();
            }
        });

        let runner = commands::build_runner(&adapters, &config).with_cancellation(cancel);

        printer.info("Looking for missing reports...");
        let result = runner.run().await?;

        report(&printer, format, &result);

        if !result.success() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn report(printer: &Printer, format: OutputFormat, result: &SyncResult) {
    for dup in &result.plan.duplicate_folders {
        printer.warn(&format!(
            "Two folders share the name '{}'; uploads go to {}",
            dup.name, dup.kept
        ));
    }

    for scan in result.plan.scans.iter().filter(|s| s.failed()) {
        if let Some(error) = &scan.error {
            printer.warn(&format!("Could not scan {}: {error}", scan.user));
        }
    }

    match result.status() {
        RunStatus::UpToDate => printer.success("Already up to date"),
        RunStatus::Synced => printer.success(&format!(
            "Uploaded {} missing report(s) in {}",
            result.uploaded(),
            format_duration(result.duration_ms)
        )),
        RunStatus::Degraded => printer.error(&format!(
            "Sync finished with problems: {} uploaded, {} failed, {} skipped",
            result.uploaded(),
            result.failed(),
            result.skipped()
        )),
    }

    for outcome in &result.outcomes {
        match &outcome.status {
            ItemStatus::Uploaded { .. } => {
                printer.info(&format!("uploaded  {}", outcome.name));
            }
            ItemStatus::SkippedNoFolder => {
                printer.warn(&format!(
                    "no folder for '{}'; generated {} but did not upload",
                    outcome.user, outcome.name
                ));
            }
            ItemStatus::RenderFailed(err) => {
                printer.error(&format!("generate  {}: {err}", outcome.name));
            }
            ItemStatus::UploadFailed(err) => {
                printer.error(&format!("upload    {}: {err}", outcome.name));
            }
        }
    }

    if result.cancelled {
        printer.warn("Run was cancelled before every item was attempted");
    }

    if format == OutputFormat::Json {
        printer.print_json(&result_json(result));
    }
}

fn result_json(result: &SyncResult) -> serde_json::Value {
    let outcomes: Vec<serde_json::Value> = result
        .outcomes
        .iter()
        .map(|o| {
            let (status, error) = match &o.status {
                ItemStatus::Uploaded { file } => ("uploaded", Some(file.to_string())),
                ItemStatus::SkippedNoFolder => ("skipped_no_folder", None),
                ItemStatus::RenderFailed(e) => ("render_failed", Some(e.to_string())),
                ItemStatus::UploadFailed(e) => ("upload_failed", Some(e.to_string())),
            };
            serde_json::json!({
                "user": o.user,
                "date": o.date.to_string(),
                "name": o.name,
                "status": status,
                "detail": error,
            })
        })
        .collect();

    let scans: Vec<serde_json::Value> = result
        .plan
        .scans
        .iter()
        .map(|s| {
            serde_json::json!({
                "user": s.user,
                "reports_seen": s.reports_seen,
                "missing": s.missing,
                "error": s.error.as_ref().map(|e| e.to_string()),
            })
        })
        .collect();

    serde_json::json!({
        "status": status_label(result.status()),
        "success": result.success(),
        "users_scanned": result.plan.users_scanned(),
        "reports_scanned": result.plan.reports_scanned(),
        "missing_found": result.missing_found(),
        "uploaded": result.uploaded(),
        "skipped": result.skipped(),
        "failed": result.failed(),
        "cancelled": result.cancelled,
        "duration_ms": result.duration_ms,
        "scans": scans,
        "outcomes": outcomes,
    })
}

fn status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::UpToDate => "up_to_date",
        RunStatus::Synced => "synced",
        RunStatus::Degraded => "degraded",
    }
}

fn format_duration(ms: u64) -> String {
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{ms}ms")
    }
}
