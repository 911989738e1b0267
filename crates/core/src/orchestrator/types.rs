//! Types for the publish orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::fetcher::FetchError;
use crate::source::{PublishDate, RemoteKey};
use crate::storage::{StorageError, UploadReceipt};

use super::config::FailurePolicy;

/// A fatal failure while processing one source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The download failed at the transport level.
    #[error("{source_name}: download for {key} failed: {error}")]
    Fetch {
        source_name: String,
        key: RemoteKey,
        #[source]
        error: FetchError,
    },

    /// The upload failed.
    #[error("{source_name}: upload to {key} failed: {error}")]
    Publish {
        source_name: String,
        key: RemoteKey,
        #[source]
        error: StorageError,
    },
}

impl PipelineError {
    /// Whether the storage backend rejected our credentials. Every later
    /// upload in the run would fail the same way.
    pub fn is_credential(&self) -> bool {
        matches!(self, Self::Publish { error, .. } if error.is_credential())
    }

    pub fn source_name(&self) -> &str {
        match self {
            Self::Fetch { source_name, .. } | Self::Publish { source_name, .. } => source_name,
        }
    }
}

/// Non-failing end states of one source's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// The object was already in storage; nothing was downloaded.
    Skipped,
    /// Downloaded and uploaded.
    Published(UploadReceipt),
    /// The upstream has not released this day's file yet. Holds the benign
    /// fetch error that said so.
    Unavailable(FetchError),
}

impl SourceOutcome {
    pub fn state(&self) -> SourceState {
        match self {
            Self::Skipped => SourceState::Skipped,
            Self::Published(_) => SourceState::Published,
            Self::Unavailable(_) => SourceState::Unavailable,
        }
    }

    /// Short text for the run report: integrity token or unavailability reason.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Skipped => None,
            Self::Published(receipt) => Some(receipt.content_hash.clone()),
            Self::Unavailable(FetchError::NotYetAvailable { status }) => {
                Some(format!("HTTP {}", status))
            }
            Self::Unavailable(error) => Some(error.to_string()),
        }
    }
}

/// Terminal state of one source in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceState {
    Skipped,
    Published,
    Unavailable,
    Failed,
}

impl SourceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Published => "published",
            Self::Unavailable => "unavailable",
            Self::Failed => "failed",
        }
    }

    /// Skipped and Unavailable are expected and do not affect the exit code.
    pub fn is_benign(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// What happened to one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: String,
    /// Puzzle date after the source's day offset.
    pub date: PublishDate,
    pub key: RemoteKey,
    pub state: SourceState,
    /// Integrity token, HTTP status or error text, depending on `state`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Summary of one run over all configured sources.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub run_date: PublishDate,
    pub policy: FailurePolicy,
    /// Sources in the order they were processed. Sources after an abort are
    /// absent.
    pub sources: Vec<SourceReport>,
    /// Fatal errors, in the order they happened.
    pub errors: Vec<PipelineError>,
    /// Whether the run stopped before reaching every source.
    pub aborted: bool,
}

impl RunReport {
    pub fn new(run_date: PublishDate, policy: FailurePolicy) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            run_date,
            policy,
            sources: Vec::new(),
            errors: Vec::new(),
            aborted: false,
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn count(&self, state: SourceState) -> usize {
        self.sources.iter().filter(|s| s.state == state).count()
    }

    pub fn state_of(&self, source: &str) -> Option<SourceState> {
        self.sources
            .iter()
            .find(|s| s.source == source)
            .map(|s| s.state)
    }

    /// Process exit status for this run.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> RemoteKey {
        RemoteKey::new("/NYT/2024-03-15-Fri-crossword.pdf")
    }

    #[test]
    fn test_credential_classification() {
        let err = PipelineError::Publish {
            source_name: "nyt".to_string(),
            key: key(),
            error: StorageError::Credential("expired".to_string()),
        };
        assert!(err.is_credential());
        assert_eq!(err.source_name(), "nyt");

        let err = PipelineError::Fetch {
            source_name: "wsj".to_string(),
            key: key(),
            error: FetchError::Timeout,
        };
        assert!(!err.is_credential());
    }

    #[test]
    fn test_error_display() {
        let err = PipelineError::Fetch {
            source_name: "nyt".to_string(),
            key: key(),
            error: FetchError::Transport("dns failure".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "nyt: download for /NYT/2024-03-15-Fri-crossword.pdf failed: transport error: dns failure"
        );
    }

    #[test]
    fn test_outcome_detail() {
        let outcome = SourceOutcome::Unavailable(FetchError::NotYetAvailable { status: 404 });
        assert_eq!(outcome.state(), SourceState::Unavailable);
        assert_eq!(outcome.detail().as_deref(), Some("HTTP 404"));

        let outcome = SourceOutcome::Unavailable(FetchError::NotPdf { bytes: 18 });
        assert_eq!(
            outcome.detail().as_deref(),
            Some("response is not a PDF (18 bytes)")
        );

        assert_eq!(SourceOutcome::Skipped.detail(), None);
    }

    #[test]
    fn test_only_failed_is_not_benign() {
        assert!(SourceState::Skipped.is_benign());
        assert!(SourceState::Published.is_benign());
        assert!(SourceState::Unavailable.is_benign());
        assert!(!SourceState::Failed.is_benign());
    }

    #[test]
    fn test_report_exit_code() {
        let date = PublishDate::from_ymd(2024, 3, 15).unwrap();
        let mut report = RunReport::new(date, FailurePolicy::FailFast);
        report.sources.push(SourceReport {
            source: "nyt".to_string(),
            date,
            key: key(),
            state: SourceState::Unavailable,
            detail: Some("HTTP 404".to_string()),
        });
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.count(SourceState::Unavailable), 1);
        assert_eq!(report.state_of("nyt"), Some(SourceState::Unavailable));
        assert_eq!(report.state_of("wsj"), None);

        report.errors.push(PipelineError::Fetch {
            source_name: "wsj".to_string(),
            key: key(),
            error: FetchError::Timeout,
        });
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_source_report_serialization() {
        let report = SourceReport {
            source: "wsj".to_string(),
            date: PublishDate::from_ymd(2024, 3, 16).unwrap(),
            key: RemoteKey::new("/WSJ/2024-03-16-Sat-crossword.pdf"),
            state: SourceState::Skipped,
            detail: None,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"source":"wsj","date":"2024-03-16","key":"/WSJ/2024-03-16-Sat-crossword.pdf","state":"skipped"}"#
        );
    }
}
