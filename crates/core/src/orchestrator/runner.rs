//! Publish orchestrator implementation.
//!
//! Runs each source through the publish pipeline, one source at a time,
//! in the order given.

use std::sync::Arc;

use tracing::{error, info, info_span, warn, Instrument};

use crate::fetcher::Fetcher;
use crate::source::{
    destination_key, resolve, ContentSource, PublishDate, RemoteKey, SourceRequest,
};
use crate::storage::ObjectStore;

use super::config::{FailurePolicy, OrchestratorConfig};
use super::types::{PipelineError, RunReport, SourceOutcome, SourceReport, SourceState};

/// Drives every configured source through the fetch-and-publish pipeline.
pub struct PublishOrchestrator {
    config: OrchestratorConfig,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn ObjectStore>,
}

impl PublishOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config,
            fetcher,
            store,
        }
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.config.failure_policy
    }

    /// Runs the pipeline for one source.
    ///
    /// Benign outcomes come back as `Ok`; only transport and upload failures
    /// are errors.
    pub async fn process_source(
        &self,
        source: &ContentSource,
        date: PublishDate,
    ) -> Result<SourceOutcome, PipelineError> {
        let key = destination_key(source, date);
        self.publish(source, resolve(source, date), &key).await
    }

    /// Check, fetch and upload `request` to `key`, both derived from the
    /// same source and run date by the caller.
    async fn publish(
        &self,
        source: &ContentSource,
        request: SourceRequest,
        key: &RemoteKey,
    ) -> Result<SourceOutcome, PipelineError> {
        info!(key = %key, "Checking if file exists");
        if self.store.exists(key).await {
            info!(key = %key, "File already uploaded");
            return Ok(SourceOutcome::Skipped);
        }

        info!(date = %request.date, "Downloading crossword");

        let payload = match self.fetcher.fetch(&request).await {
            Ok(payload) => payload,
            Err(e) if e.is_benign() => {
                info!(date = %request.date, reason = %e, "Crossword is not yet released");
                return Ok(SourceOutcome::Unavailable(e));
            }
            Err(e) => {
                return Err(PipelineError::Fetch {
                    source_name: source.name.clone(),
                    key: key.clone(),
                    error: e,
                });
            }
        };
        info!(date = %request.date, bytes = payload.len(), "Downloaded crossword");

        match self.store.upload(key, payload).await {
            Ok(receipt) => {
                info!(key = %key, content_hash = %receipt.content_hash, "Uploaded crossword");
                Ok(SourceOutcome::Published(receipt))
            }
            Err(e) => Err(PipelineError::Publish {
                source_name: source.name.clone(),
                key: key.clone(),
                error: e,
            }),
        }
    }

    /// Processes `sources` in order for the run date `date`.
    ///
    /// Under [`FailurePolicy::FailFast`] the first failure ends the run.
    /// Under [`FailurePolicy::BestEffort`] later sources still run, except
    /// after a credential failure, which always ends the run.
    pub async fn run(&self, sources: &[ContentSource], date: PublishDate) -> RunReport {
        let mut report = RunReport::new(date, self.config.failure_policy);
        let run_span = info_span!("run", run_id = %report.run_id, date = %date);

        async {
            info!(
                sources = sources.len(),
                policy = %self.config.failure_policy,
                store = self.store.name(),
                fetcher = self.fetcher.name(),
                "Starting run"
            );

            for source in sources {
                let span = info_span!("source", name = %source.name);
                let key = destination_key(source, date);
                let request = resolve(source, date);
                let effective = request.date;

                let result = self.publish(source, request, &key).instrument(span).await;

                match result {
                    Ok(outcome) => {
                        report.sources.push(SourceReport {
                            source: source.name.clone(),
                            date: effective,
                            key,
                            state: outcome.state(),
                            detail: outcome.detail(),
                        });
                    }
                    Err(e) => {
                        let stop = e.is_credential()
                            || self.config.failure_policy == FailurePolicy::FailFast;

                        if e.is_credential() {
                            error!(
                                source = %source.name,
                                error = %e,
                                "Storage credential rejected, the refresh token has likely expired"
                            );
                        } else {
                            error!(source = %source.name, error = %e, "Source failed");
                        }

                        report.sources.push(SourceReport {
                            source: source.name.clone(),
                            date: effective,
                            key,
                            state: SourceState::Failed,
                            detail: Some(e.to_string()),
                        });
                        report.errors.push(e);

                        if stop {
                            report.aborted = report.sources.len() < sources.len();
                            break;
                        }
                    }
                }
            }

            if report.aborted {
                warn!(
                    not_attempted = sources.len() - report.sources.len(),
                    "Run aborted before all sources"
                );
            }

            info!(
                published = report.count(SourceState::Published),
                skipped = report.count(SourceState::Skipped),
                unavailable = report.count(SourceState::Unavailable),
                failed = report.count(SourceState::Failed),
                "Run finished"
            );
        }
        .instrument(run_span)
        .await;

        report
    }
}
