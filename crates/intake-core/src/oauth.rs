//! OAuth bridge contract.
//!
//! The flow itself (PKCE, local callback listener, token exchange) lives
//! behind `AuthorizationFlow`. When it completes it emits
//! `OAUTH_SUCCESS_EVENT` with an `OAuthSuccessPayload`.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::IntakeError;

/// Default name of the completion event.
pub const OAUTH_SUCCESS_EVENT: &str = "openai-oauth-success";

/// Starts a browser-based authorization.
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    /// Prepares the flow and returns the URL the user must visit.
    ///
    /// # Errors
    /// Returns an error if the flow could not be started.
    async fn authorization_url(&self) -> Result<String>;
}

/// Credentials delivered by a completed authorization.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthSuccessPayload {
    pub email: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl std::fmt::Debug for OAuthSuccessPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSuccessPayload")
            .field("email", &self.email)
            .field(
                "access_token",
                &crate::accounts::mask_secret(&self.access_token),
            )
            .field(
                "refresh_token",
                &crate::accounts::mask_secret(&self.refresh_token),
            )
            .finish()
    }
}

impl OAuthSuccessPayload {
    /// Decodes an event payload.
    ///
    /// # Errors
    /// Returns `IntakeError::Subscription` if the payload is not a valid
    /// completion object or carries no access token.
    pub fn from_value(value: Value) -> Result<Self, IntakeError> {
        let payload: Self = serde_json::from_value(value)
            .map_err(|e| IntakeError::Subscription(format!("Invalid OAuth payload: {e}")))?;
        if payload.access_token.trim().is_empty() {
            return Err(IntakeError::Subscription(
                "OAuth payload has no access token".to_string(),
            ));
        }
        Ok(payload)
    }
}

/// Parses the URL returned by the flow, accepting only absolute http(s) URLs.
///
/// # Errors
/// Returns an error if the URL is malformed or uses another scheme.
pub fn parse_authorization_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("Invalid authorization URL '{raw}': {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!("Unsupported authorization URL scheme: {other}"),
    }
}
