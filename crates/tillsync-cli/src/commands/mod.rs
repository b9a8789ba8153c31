//! CLI commands and shared adapter wiring

pub mod plan;
pub mod sync;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use tillsync_core::config::Config;
use tillsync_core::ports::{DocumentGenerator, ReportSource, StorageIndex};
use tillsync_drive::{AuthFlow, DriveAuthConfig, DriveClient, DriveStorage};
use tillsync_engine::SyncRunner;
use tillsync_pos::{PosClient, PosCredentials};

use crate::output::Printer;

/// The connected adapters a run needs
pub(crate) struct Adapters {
    pub pos: Arc<PosClient>,
    pub drive: Arc<DriveStorage>,
}

/// Logs in to both remote services
pub(crate) async fn connect(config: &Config, printer: &Printer) -> Result<Adapters> {
    printer.info("Logging in to the drive account...");
    let tokens = drive_login(config).await?;
    let drive = Arc::new(DriveStorage::new(DriveClient::new(tokens.access_token)));
    printer.success("Drive login complete");

    printer.info("Logging in to the POS account...");
    let pos = Arc::new(
        PosClient::login(&PosCredentials {
            email: config.pos.email.clone(),
            password: config.pos.password.clone(),
        })
        .await
        .context("POS provider login failed")?,
    );
    printer.success("POS login complete");

    Ok(Adapters { pos, drive })
}

/// Builds the runner over the connected adapters
pub(crate) fn build_runner(adapters: &Adapters, config: &Config) -> SyncRunner {
    let reports: Arc<dyn ReportSource> = Arc::clone(&adapters.pos) as Arc<dyn ReportSource>;
    let storage: Arc<dyn StorageIndex> = Arc::clone(&adapters.drive) as Arc<dyn StorageIndex>;
    let generator: Arc<dyn DocumentGenerator> =
        Arc::clone(&adapters.pos) as Arc<dyn DocumentGenerator>;
    SyncRunner::new(
        reports,
        storage,
        generator,
        config.drive.root_folder.clone(),
        config.run.clone(),
    )
}

/// Acquires drive tokens: refresh when configured, interactive otherwise
async fn drive_login(config: &Config) -> Result<tillsync_drive::Tokens> {
    let flow = AuthFlow::new(&DriveAuthConfig::new(
        config.drive.client_id.as_str(),
        config.drive.client_secret.as_str(),
    ))?;

    if let Some(refresh_token) = &config.drive.refresh_token {
        return flow
            .refresh(refresh_token)
            .await
            .context("Drive token refresh failed; re-run interactively to re-authorize");
    }

    let pending = flow.begin();
    println!("Open this URL in a browser and authorize access:");
    println!("  {}", pending.url);
    let code = prompt("Paste the authorization code: ")?;

    let tokens = flow
        .finish(pending, code)
        .await
        .context("Authorization code exchange failed")?;

    if let Some(refresh) = &tokens.refresh_token {
        println!("Set DRIVE_REFRESH_TOKEN={refresh} to skip this step on future runs.");
    }

    Ok(tokens)
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}
