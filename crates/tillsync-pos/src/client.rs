//! POS provider HTTP client
//!
//! Logs in with the resource-owner password grant the provider exposes for
//! integrations, then calls the user, report, and PDF endpoints with the
//! bearer token. Base URLs are overridable so tests can point at a mock
//! server.

use anyhow::{bail, Context, Result};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info};

use tillsync_core::domain::{FetchError, RenderError};

/// Base URL for the provider's API
const API_BASE_URL: &str = "https://api.zettle.example.com";

/// Base URL for the provider's OAuth token endpoint
const AUTH_BASE_URL: &str = "https://oauth.zettle.example.com";

/// Provider login credentials
#[derive(Debug, Clone)]
pub struct PosCredentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Response from the token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// One user from the provider's user listing
#[derive(Debug, Clone, Deserialize)]
pub struct PosUser {
    /// Provider-side user identifier
    pub id: String,
    /// Display name (matched against drive folder names)
    pub name: String,
}

/// Authenticated HTTP client for the POS provider
pub struct PosClient {
    http: Client,
    api_base_url: String,
    access_token: String,
}

impl PosClient {
    /// Logs in with the password grant and returns an authenticated client
    pub async fn login(credentials: &PosCredentials) -> Result<Self> {
        Self::login_with_base_urls(credentials, API_BASE_URL, AUTH_BASE_URL).await
    }

    /// Logs in against custom base URLs (useful for testing)
    pub async fn login_with_base_urls(
        credentials: &PosCredentials,
        api_base_url: impl Into<String>,
        auth_base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::new();
        let auth_base_url = auth_base_url.into();

        info!(email = %credentials.email, "Logging in to POS provider");

        let response = http
            .post(format!("{auth_base_url}/token"))
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.email.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach the provider token endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Provider login failed with {status}: {body}");
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to decode the provider token response")?;

        Ok(Self {
            http,
            api_base_url: api_base_url.into(),
            access_token: token.access_token,
        })
    }

    async fn get(&self, path: &str) -> Result<Response, FetchError> {
        let response = self
            .http
            .get(format!("{}{path}", self.api_base_url))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Fetches the provider's user listing
    pub(crate) async fn fetch_users(&self) -> Result<Vec<PosUser>, FetchError> {
        let users: Vec<PosUser> = self
            .get("/users")
            .await?
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        debug!(count = users.len(), "Fetched POS users");
        Ok(users)
    }

    /// Fetches one user's daily reports as raw JSON objects
    ///
    /// The summary fields vary by provider version; the core treats them as
    /// opaque, so they are passed through undecoded.
    pub(crate) async fn fetch_daily_reports(
        &self,
        user_id: &str,
    ) -> Result<Vec<serde_json::Value>, FetchError> {
        let reports: Vec<serde_json::Value> = self
            .get(&format!("/users/{user_id}/reports/daily"))
            .await?
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        debug!(user_id, count = reports.len(), "Fetched daily reports");
        Ok(reports)
    }

    /// Fetches the provider-rendered PDF for one daily report
    pub(crate) async fn fetch_report_pdf(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let response = self
            .http
            .get(format!(
                "{}/users/{user_id}/reports/daily/{date}/pdf",
                self.api_base_url
            ))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| RenderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RenderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RenderError::Network(e.to_string()))?;

        if bytes.is_empty() {
            return Err(RenderError::InvalidDocument(
                "provider returned an empty document".to_string(),
            ));
        }

        Ok(bytes.to_vec())
    }
}
