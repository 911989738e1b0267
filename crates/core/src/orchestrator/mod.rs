//! Publish orchestrator.
//!
//! For each source: compute the storage key, skip if it already exists,
//! otherwise download and upload. Sources run strictly one after another;
//! the only shared resources are the fetcher and the store handed in at
//! construction.

mod config;
mod runner;
mod types;

pub use config::{FailurePolicy, OrchestratorConfig};
pub use runner::PublishOrchestrator;
pub use types::{PipelineError, RunReport, SourceOutcome, SourceReport, SourceState};
