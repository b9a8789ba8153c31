//! Configuration module for Tillsync.
//!
//! Configuration comes from the environment: the tool runs headless on a
//! schedule, and its operators deploy it with env files. Typed sections keep
//! the drive, provider, and run settings apart.

use anyhow::{bail, Context, Result};

use crate::domain::newtypes::FolderId;

/// Default bounded concurrency for the per-user scan phase
const DEFAULT_SCAN_CONCURRENCY: usize = 4;

/// Default bounded concurrency for the generate+upload phase
const DEFAULT_UPLOAD_CONCURRENCY: usize = 4;

/// Top-level configuration for Tillsync.
#[derive(Debug, Clone)]
pub struct Config {
    pub drive: DriveConfig,
    pub pos: PosConfig,
    pub run: RunConfig,
}

/// Cloud drive settings.
#[derive(Debug, Clone)]
pub struct DriveConfig {
    /// OAuth2 application (client) ID.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// The root folder holding one child folder per user.
    pub root_folder: FolderId,
    /// Refresh token from an earlier interactive login; lets scheduled runs
    /// skip the browser step.
    pub refresh_token: Option<String>,
}

/// POS provider credentials.
#[derive(Debug, Clone)]
pub struct PosConfig {
    /// Account email for the provider login.
    pub email: String,
    /// Account password for the provider login.
    pub password: String,
}

/// Per-run engine settings.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Concurrent per-user scans.
    pub scan_concurrency: usize,
    /// Concurrent generate+upload items.
    pub upload_concurrency: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scan_concurrency: DEFAULT_SCAN_CONCURRENCY,
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `CLIENT_ID`, `CLIENT_SECRET`, `DRIVE_FOLDER_ID`,
    /// `POS_EMAIL`, `POS_PASSWORD`.
    /// Optional: `DRIVE_REFRESH_TOKEN`, `TILLSYNC_SCAN_CONCURRENCY`,
    /// `TILLSYNC_UPLOAD_CONCURRENCY`.
    pub fn from_env() -> Result<Self> {
        let root_folder = FolderId::new(require_env("DRIVE_FOLDER_ID")?)
            .context("DRIVE_FOLDER_ID is not a valid drive folder ID")?;

        Ok(Self {
            drive: DriveConfig {
                client_id: require_env("CLIENT_ID")?,
                client_secret: require_env("CLIENT_SECRET")?,
                root_folder,
                refresh_token: std::env::var("DRIVE_REFRESH_TOKEN")
                    .ok()
                    .filter(|v| !v.is_empty()),
            },
            pos: PosConfig {
                email: require_env("POS_EMAIL")?,
                password: require_env("POS_PASSWORD")?,
            },
            run: RunConfig {
                scan_concurrency: optional_env_usize(
                    "TILLSYNC_SCAN_CONCURRENCY",
                    DEFAULT_SCAN_CONCURRENCY,
                )?,
                upload_concurrency: optional_env_usize(
                    "TILLSYNC_UPLOAD_CONCURRENCY",
                    DEFAULT_UPLOAD_CONCURRENCY,
                )?,
            },
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("Missing required environment variable '{name}'"),
    }
}

fn optional_env_usize(name: &str, default: usize) -> Result<usize> {
    match std::env::var(name) {
        Ok(value) => {
            let parsed: usize = value
                .parse()
                .with_context(|| format!("'{name}' must be a positive integer, got '{value}'"))?;
            if parsed == 0 {
                bail!("'{name}' must be at least 1");
            }
            Ok(parsed)
        }
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_defaults() {
        let run = RunConfig::default();
        assert_eq!(run.scan_concurrency, DEFAULT_SCAN_CONCURRENCY);
        assert_eq!(run.upload_concurrency, DEFAULT_UPLOAD_CONCURRENCY);
    }

    #[test]
    fn test_optional_env_usize_default_when_absent() {
        let value = optional_env_usize("TILLSYNC_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
