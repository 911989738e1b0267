//! Error types for the fetcher module.

use thiserror::Error;

/// Outcomes of a download other than a successful body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with something other than 200; the puzzle for
    /// that date has not been released yet.
    #[error("not yet available (HTTP {status})")]
    NotYetAvailable { status: u16 },

    /// The server answered 200 with something other than a PDF, usually a
    /// login page served in place of the puzzle.
    #[error("response is not a PDF ({bytes} bytes)")]
    NotPdf { bytes: usize },

    /// DNS, TLS, connection or body-read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,
}

impl FetchError {
    /// Whether this is the expected "come back later" outcome.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::NotYetAvailable { .. } | Self::NotPdf { .. })
    }

    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error.to_string())
        }
    }
}
