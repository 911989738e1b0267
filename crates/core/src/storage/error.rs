//! Error types for the storage module.

use thiserror::Error;

/// Errors returned by an object store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend rejected our credentials (expired or revoked token).
    #[error("credential rejected: {0}")]
    Credential(String),

    /// Connection-level failure talking to the backend.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend did not answer within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The backend answered with an error status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The backend answered 2xx but the body was not what we expected.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Missing app key, secret or refresh token.
    #[error("storage not configured: {0}")]
    NotConfigured(String),
}

impl StorageError {
    /// Whether this failure will recur on every call until someone fixes the
    /// credentials.
    pub fn is_credential(&self) -> bool {
        matches!(self, Self::Credential(_))
    }

    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error.to_string())
        }
    }
}
