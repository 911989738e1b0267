mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crossword_core::{
    load_config, validate_config, DropboxStore, Fetcher, HttpFetcher, ObjectStore, PublishDate,
    PublishOrchestrator, SanitizedConfig,
};

use cli::{Cli, LogFormat};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "crossword.toml";

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with((format == LogFormat::Pretty).then(tracing_subscriber::fmt::layer))
        .with((format == LogFormat::Json).then(|| tracing_subscriber::fmt::layer().json()))
        .init();
}

async fn run() -> Result<i32> {
    // A missing .env is fine; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.log_format);

    let config_path = cli.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    });

    match &config_path {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("No config file, using environment only"),
    }
    let mut config = load_config(config_path.as_deref())
        .context("Failed to load configuration")?;

    if let Some(policy) = cli.failure_policy {
        config.orchestrator.failure_policy = policy;
    }

    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    if config.nyt.enabled && !config.nyt.has_cookie() {
        warn!("NYT is enabled without a cookie; downloads will likely be refused");
    }

    let tz = config.timezone()?;
    let date = cli.date.unwrap_or_else(|| PublishDate::today_in(tz));

    let mut sources = config.sources();
    if !cli.sources.is_empty() {
        sources.retain(|s| cli.sources.contains(&s.name));
        if sources.is_empty() {
            bail!(
                "none of the requested sources are enabled: {}",
                cli.sources.join(", ")
            );
        }
    }

    let fetcher: Arc<dyn Fetcher> =
        Arc::new(HttpFetcher::new(&config.fetcher).context("Failed to create HTTP client")?);
    let store: Arc<dyn ObjectStore> = Arc::new(
        DropboxStore::new(config.storage.clone()).context("Failed to create Dropbox client")?,
    );

    let orchestrator = PublishOrchestrator::new(config.orchestrator.clone(), fetcher, store);
    let report = orchestrator.run(&sources, date).await;

    for source in &report.sources {
        info!(
            source = %source.source,
            date = %source.date,
            key = %source.key,
            state = source.state.as_str(),
            detail = source.detail.as_deref().unwrap_or(""),
            "Source result"
        );
    }

    for e in &report.errors {
        error!(source = e.source_name(), "{}", e);
    }

    Ok(report.exit_code())
}
