//! Account store contract.
//!
//! Persisting accounts is the store's job; the dialog only hands over the
//! validated credentials and reports the outcome.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Where the value in the session-token field came from.
///
/// OAuth autofill places the refresh token into the session-token field, so
/// the store needs to know which kind of token it received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionTokenSource {
    /// Typed or pasted by the user.
    #[default]
    Manual,
    /// Refresh token delivered by the OAuth flow.
    #[serde(rename = "oauth_refresh")]
    OAuthRefresh,
}

/// Web-session account credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAccountRequest {
    pub email: String,
    pub access_token: String,
    /// Empty when the user left the field blank.
    pub session_token: String,
    pub session_token_source: SessionTokenSource,
}

/// API-key account credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiAccountRequest {
    /// Email or free-form label identifying the key.
    pub email: String,
    pub api_key: String,
}

impl std::fmt::Debug for WebAccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebAccountRequest")
            .field("email", &self.email)
            .field("access_token", &mask_secret(&self.access_token))
            .field("session_token", &mask_secret(&self.session_token))
            .field("session_token_source", &self.session_token_source)
            .finish()
    }
}

impl std::fmt::Debug for ApiAccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiAccountRequest")
            .field("email", &self.email)
            .field("api_key", &mask_secret(&self.api_key))
            .finish()
    }
}

/// Persists new accounts.
///
/// Idempotency and validation of the credentials themselves are up to the
/// implementation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Adds a web-session account.
    ///
    /// # Errors
    /// Returns an error if the store rejects or fails to persist the account.
    async fn add_web_account(&self, request: WebAccountRequest) -> Result<()>;

    /// Adds an API-key account.
    ///
    /// # Errors
    /// Returns an error if the store rejects or fails to persist the account.
    async fn add_api_account(&self, request: ApiAccountRequest) -> Result<()>;
}

/// Returns a masked version of a secret for display and logs.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 16 {
        return "***".to_string();
    }
    let head: String = chars[..8].iter().collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("short"), "***");
        assert_eq!(mask_secret("sk-proj-abcdefghijklmnop"), "sk-proj-...");
    }

    #[test]
    fn test_debug_output_hides_tokens() {
        let request = WebAccountRequest {
            email: "a@b.com".to_string(),
            access_token: "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9".to_string(),
            session_token: String::new(),
            session_token_source: SessionTokenSource::Manual,
        };
        let rendered = format!("{request:?}");
        assert!(rendered.contains("a@b.com"));
        assert!(!rendered.contains("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9"));

        let request = ApiAccountRequest {
            email: "ci bot".to_string(),
            api_key: "sk-123".to_string(),
        };
        assert!(!format!("{request:?}").contains("sk-123"));
    }

    #[test]
    fn test_session_token_source_serializes_snake_case() {
        let json = serde_json::to_string(&SessionTokenSource::OAuthRefresh).unwrap();
        assert_eq!(json, "\"oauth_refresh\"");
    }
}
