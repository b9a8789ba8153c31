//! Plan command - dry run
//!
//! Runs the scan phase only and prints what a sync would do. No documents
//! are generated and nothing is uploaded.

use anyhow::{Context, Result};
use clap::Args;

use tillsync_core::config::Config;
use tillsync_core::identity;

use crate::commands;
use crate::output::{OutputFormat, Printer};

#[derive(Debug, Args)]
pub struct PlanCommand {}

impl PlanCommand {
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        let printer = Printer::new(format);

        let config =
            Config::from_env().context("Failed to load configuration from the environment")?;
        printer.success("Configuration loaded");

        let adapters = commands::connect(&config, &printer).await?;
        let runner = commands::build_runner(&adapters, &config);

        printer.info("Looking for missing reports...");
        let plan = runner.scan().await?;

        for dup in &plan.duplicate_folders {
            printer.warn(&format!(
                "Two folders share the name '{}'; uploads would go to {}",
                dup.name, dup.kept
            ));
        }

        for scan in plan.scans.iter().filter(|s| s.failed()) {
            if let Some(error) = &scan.error {
                printer.warn(&format!("Could not scan {}: {error}", scan.user));
            }
        }

        if plan.missing.is_empty() {
            printer.success("Already up to date; a sync would do nothing");
        } else {
            printer.success(&format!(
                "A sync would generate {} missing report(s):",
                plan.missing.len()
            ));
            for item in &plan.missing {
                let path = identity::storage_path(item.report());
                if item.has_destination() {
                    printer.info(&format!("{path}"));
                } else {
                    printer.info(&format!("{path} (no destination folder)"));
                }
            }
        }

        if format == OutputFormat::Json {
            let missing: Vec<serde_json::Value> = plan
                .missing
                .iter()
                .map(|item| {
                    serde_json::json!({
                        "user": item.report().user().name().to_string(),
                        "date": item.report().date().to_string(),
                        "name": item.canonical_name(),
                        "destination": item.destination().map(|f| f.to_string()),
                    })
                })
                .collect();

            printer.print_json(&serde_json::json!({
                "users_scanned": plan.users_scanned(),
                "reports_scanned": plan.reports_scanned(),
                "missing": missing,
                "scan_failures": plan.scans.iter().filter(|s| s.failed()).count(),
            }));
        }

        Ok(())
    }
}
