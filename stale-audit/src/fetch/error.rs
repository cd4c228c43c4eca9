//! Remote fetch error types.

use thiserror::Error;

/// Errors that can occur while talking to the hosting service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Network or HTTP failure.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Credentials were rejected.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// The referenced resource does not exist.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The response was missing a required field.
    #[error("Incomplete response for {resource}: missing {field}")]
    Incomplete { resource: String, field: String },

    /// The scan was cancelled before the request was issued.
    #[error("Cancelled")]
    Cancelled,
}

impl FetchError {
    /// Creates a transport error from any displayable cause.
    pub fn transport(message: impl ToString) -> Self {
        Self::Transport {
            message: message.to_string(),
        }
    }

    /// Returns true if the error means the credentials are unusable.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}
