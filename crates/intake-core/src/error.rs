//! Error taxonomy for the intake dialog.

use thiserror::Error;

/// A required field is missing. Raised before any collaborator is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing email")]
    MissingEmail,
    #[error("missing access token")]
    MissingAccessToken,
    #[error("missing API key")]
    MissingApiKey,
}

impl ValidationError {
    /// String-catalog key of the user-facing message.
    pub fn message_key(self) -> &'static str {
        match self {
            ValidationError::MissingEmail => "accounts.add.openai.error_email",
            ValidationError::MissingAccessToken => "accounts.add.openai.error_token",
            ValidationError::MissingApiKey => "accounts.add.openai.error_api_key",
        }
    }
}

/// Errors surfaced in the dialog's status area.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A collaborator call failed; the message is the full context chain.
    #[error("{0}")]
    External(String),

    /// The OAuth notification could not be received or decoded.
    #[error("{0}")]
    Subscription(String),
}

impl IntakeError {
    /// Wraps a collaborator error, keeping its context chain.
    pub fn external(err: &anyhow::Error) -> Self {
        IntakeError::External(format!("{err:#}"))
    }
}
