//! Access-token acquisition for the Cloud Build API.
//!
//! [`CloudBuildClient`](crate::CloudBuildClient) only ever asks an
//! [`AccessTokenProvider`] for a bearer token. How that token is obtained and
//! refreshed stays behind the trait.
//!
//! [`discover_credentials`] performs discovery once at startup: a configured
//! static token wins; otherwise Application Default Credentials are used
//! (the key file named by `GOOGLE_APPLICATION_CREDENTIALS`, the gcloud
//! well-known file, or the instance metadata server).

use std::sync::Arc;

use async_trait::async_trait;
use google_cloud_auth::project::Config;
use google_cloud_auth::token::DefaultTokenSourceProvider;
use google_cloud_token::{TokenSource, TokenSourceProvider};
use pipeline::ConfigurationError;
use thiserror::Error;
use tracing::{debug, info};

/// OAuth2 scope requested for Application Default Credentials.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const SCOPES: &[&str] = &[CLOUD_PLATFORM_SCOPE];

// ---------------------------------------------------------------------------
// Token and provider trait
// ---------------------------------------------------------------------------

/// An OAuth2 bearer token. `Debug` output never contains the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// No access token could be obtained.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CredentialsError {
    message: String,
}

impl CredentialsError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Supplies bearer tokens for authenticated API calls.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Returns a token that is valid for at least the next request.
    async fn access_token(&self) -> Result<AccessToken, CredentialsError>;
}

// ---------------------------------------------------------------------------
// Static token
// ---------------------------------------------------------------------------

/// Always returns the same pre-issued token.
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<AccessToken, CredentialsError> {
        Ok(self.token.clone())
    }
}

// ---------------------------------------------------------------------------
// Application Default Credentials
// ---------------------------------------------------------------------------

/// Issues tokens from Application Default Credentials.
///
/// Token caching and refresh are handled by the underlying token source.
pub struct ApplicationDefaultTokenProvider {
    source: Arc<dyn TokenSource>,
}

impl ApplicationDefaultTokenProvider {
    /// Locates Application Default Credentials for the cloud-platform scope.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError`] if no credential source can be found or
    /// the one found is unusable.
    pub async fn new() -> Result<Self, CredentialsError> {
        let config = Config::default().with_scopes(SCOPES);
        let provider = DefaultTokenSourceProvider::new(config)
            .await
            .map_err(|e| CredentialsError::new(format!("no application default credentials: {e}")))?;

        Ok(Self {
            source: provider.token_source(),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for ApplicationDefaultTokenProvider {
    async fn access_token(&self) -> Result<AccessToken, CredentialsError> {
        debug!("Requesting access token from application default credentials");

        let value = self
            .source
            .token()
            .await
            .map_err(|e| CredentialsError::new(format!("token request failed: {e}")))?;

        // The token source yields a complete header value, e.g. "Bearer ya29...".
        let secret = value.strip_prefix("Bearer ").unwrap_or(&value);
        Ok(AccessToken::new(secret))
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Selects and verifies the credential source for this process.
///
/// A non-empty `static_token` is used as-is. Otherwise an
/// [`ApplicationDefaultTokenProvider`] is created and asked for a first
/// token, so that missing credentials are reported at startup rather than
/// on the first event.
///
/// # Errors
///
/// Returns [`ConfigurationError::Credentials`] if no credentials are found
/// or they cannot issue a token.
pub async fn discover_credentials(
    static_token: Option<String>,
) -> Result<Arc<dyn AccessTokenProvider>, ConfigurationError> {
    if let Some(token) = static_token.filter(|t| !t.is_empty()) {
        info!("Using statically configured access token");
        return Ok(Arc::new(StaticTokenProvider::new(token)));
    }

    let to_config_error = |e: CredentialsError| ConfigurationError::Credentials {
        message: e.to_string(),
    };

    let provider = ApplicationDefaultTokenProvider::new()
        .await
        .map_err(to_config_error)?;
    provider.access_token().await.map_err(to_config_error)?;

    info!("Using application default credentials");
    Ok(Arc::new(provider))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
