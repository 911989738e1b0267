pub mod config;
pub mod fetcher;
pub mod orchestrator;
pub mod source;
pub mod storage;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    SourceConfig,
};
pub use fetcher::{FetchError, Fetcher, FetcherConfig, HttpFetcher, Payload};
pub use orchestrator::{
    FailurePolicy, OrchestratorConfig, PipelineError, PublishOrchestrator, RunReport,
    SourceOutcome, SourceReport, SourceState,
};
pub use source::{
    destination_key, effective_date, resolve, ContentSource, PublishDate, RemoteKey, SourceKind,
    SourceRequest,
};
pub use storage::{
    content_hash, DropboxConfig, DropboxStore, ObjectMetadata, ObjectStore, StorageError,
    UploadReceipt, WriteMode,
};
