//! OAuth2 authorization-code flow for the Google Drive API
//!
//! Tillsync runs headless or from a terminal, so the flow is console-based:
//! the driver prints the authorization URL, the operator authorizes in a
//! browser and pastes the code back, and the flow exchanges it for tokens.
//! Refresh tokens let subsequent scheduled runs skip the interactive step.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RefreshToken,
    Scope, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Google OAuth2 authorization endpoint
const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth2 token endpoint
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Redirect URI for the console paste flow
const REDIRECT_URI: &str = "http://127.0.0.1";

/// Drive scope: full read/write access to the drive tree
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Configuration for the drive OAuth2 flow
#[derive(Debug, Clone)]
pub struct DriveAuthConfig {
    /// OAuth2 application (client) ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// OAuth scopes to request
    pub scopes: Vec<String>,
}

impl DriveAuthConfig {
    /// Creates a config with the default drive scope
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: vec![DRIVE_SCOPE.to_string()],
        }
    }

    /// Replaces the requested scopes
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }
}

/// OAuth tokens received from Google
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokens {
    /// Bearer token for API requests
    pub access_token: String,
    /// Token for refreshing without user interaction (`access_type=offline`)
    pub refresh_token: Option<String>,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
}

impl Tokens {
    /// Returns true if the access token has expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// A started authorization awaiting its code
///
/// Holds the PKCE verifier and CSRF state between the URL generation and the
/// code exchange.
pub struct PendingAuthorization {
    /// URL the operator must open in a browser
    pub url: String,
    csrf_token: CsrfToken,
    pkce_verifier: PkceCodeVerifier,
}

impl PendingAuthorization {
    /// The CSRF state value expected back from the provider
    #[must_use]
    pub fn csrf_state(&self) -> &str {
        self.csrf_token.secret()
    }
}

/// OAuth2 authorization-code flow with PKCE
pub struct AuthFlow {
    client: BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>,
    scopes: Vec<String>,
}

impl AuthFlow {
    /// Creates the flow from a drive auth configuration
    pub fn new(config: &DriveAuthConfig) -> Result<Self> {
        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(AUTH_URL.to_string()).context("Invalid authorization URL")?)
            .set_token_uri(TokenUrl::new(TOKEN_URL.to_string()).context("Invalid token URL")?)
            .set_redirect_uri(
                RedirectUrl::new(REDIRECT_URI.to_string()).context("Invalid redirect URI")?,
            );

        Ok(Self {
            client,
            scopes: config.scopes.clone(),
        })
    }

    /// Begins an authorization: generates the URL the operator must open
    ///
    /// `access_type=offline` asks Google for a refresh token so scheduled
    /// runs can renew access without a browser.
    pub fn begin(&self) -> PendingAuthorization {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = self.client.authorize_url(CsrfToken::new_random);
        for scope in &self.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }

        let (auth_url, csrf_token) = auth_request
            .set_pkce_challenge(pkce_challenge)
            .add_extra_param("access_type", "offline")
            .url();

        debug!("Generated drive authorization URL");

        PendingAuthorization {
            url: auth_url.to_string(),
            csrf_token,
            pkce_verifier,
        }
    }

    /// Exchanges the pasted authorization code for tokens
    pub async fn finish(&self, pending: PendingAuthorization, code: String) -> Result<Tokens> {
        info!("Exchanging drive authorization code for tokens");

        let http_client = reqwest::Client::new();
        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pending.pkce_verifier)
            .request_async(&http_client)
            .await
            .context("Failed to exchange authorization code")?;

        Ok(to_tokens(&token_result, None))
    }

    /// Refreshes an expired access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<Tokens> {
        info!("Refreshing drive access token");

        let http_client = reqwest::Client::new();
        let token_result = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&http_client)
            .await
            .context("Failed to refresh token")?;

        // Google omits the refresh token from refresh responses; keep ours.
        Ok(to_tokens(&token_result, Some(refresh_token)))
    }
}

fn to_tokens(
    token_result: &oauth2::basic::BasicTokenResponse,
    fallback_refresh: Option<&str>,
) -> Tokens {
    let expires_at = token_result
        .expires_in()
        .map(|d| Utc::now() + Duration::seconds(d.as_secs() as i64))
        .unwrap_or_else(|| Utc::now() + Duration::hours(1));

    Tokens {
        access_token: token_result.access_token().secret().to_string(),
        refresh_token: token_result
            .refresh_token()
            .map(|t| t.secret().to_string())
            .or_else(|| fallback_refresh.map(str::to_string)),
        expires_at,
    }
}
