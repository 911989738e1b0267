use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::fetcher::FetcherConfig;
use crate::orchestrator::{FailurePolicy, OrchestratorConfig};
use crate::source::{ContentSource, SourceKind};
use crate::storage::{DropboxConfig, WriteMode};

use super::ConfigError;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// IANA zone whose calendar day defines "today".
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub storage: DropboxConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub nyt: SourceConfig,
    #[serde(default)]
    pub wsj: SourceConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            storage: DropboxConfig::default(),
            fetcher: FetcherConfig::default(),
            nyt: SourceConfig::default(),
            wsj: SourceConfig::default(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

impl Config {
    /// Parsed reference time zone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::ValidationError(format!("unknown timezone: {}", self.timezone)))
    }

    /// Enabled sources, always in the order NYT, WSJ.
    pub fn sources(&self) -> Vec<ContentSource> {
        [(SourceKind::Nyt, &self.nyt), (SourceKind::Wsj, &self.wsj)]
            .into_iter()
            .filter(|(_, source)| source.enabled)
            .map(|(kind, source)| source.to_content_source(kind))
            .collect()
    }
}

/// Per-source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Storage folder, e.g. "/Crosswords/NYT"
    #[serde(default)]
    pub dest_prefix: String,
    /// Override for the download host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Override for the day offset (NYT 0, WSJ 1 when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_offset: Option<i64>,
    /// Session cookie sent with downloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dest_prefix: String::new(),
            base_url: None,
            day_offset: None,
            cookie: None,
        }
    }
}

impl SourceConfig {
    /// Builds the runtime source, falling back to the kind's defaults.
    pub fn to_content_source(&self, kind: SourceKind) -> ContentSource {
        let mut source = ContentSource::new(kind, self.dest_prefix.clone());
        if let Some(base_url) = &self.base_url {
            source = source.with_base_url(base_url.clone());
        }
        if let Some(days) = self.day_offset {
            source = source.with_day_offset(days);
        }
        if let Some(cookie) = self.cookie.as_ref().filter(|c| !c.is_empty()) {
            source = source.with_cookie(cookie.clone());
        }
        source
    }

    pub fn has_cookie(&self) -> bool {
        self.cookie.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub timezone: String,
    pub storage: SanitizedStorageConfig,
    pub fetcher: FetcherConfig,
    pub sources: Vec<SanitizedSourceConfig>,
    pub failure_policy: FailurePolicy,
}

/// Sanitized storage config (secrets hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub app_key_configured: bool,
    pub app_secret_configured: bool,
    pub refresh_token_configured: bool,
    pub write_mode: WriteMode,
    pub timeout_secs: u64,
}

/// Sanitized source config (cookie hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSourceConfig {
    pub name: String,
    pub enabled: bool,
    pub dest_prefix: String,
    pub base_url: String,
    pub day_offset: i64,
    pub cookie_configured: bool,
}

impl SanitizedSourceConfig {
    fn new(kind: SourceKind, config: &SourceConfig) -> Self {
        let source = config.to_content_source(kind);
        Self {
            name: source.name,
            enabled: config.enabled,
            dest_prefix: source.dest_prefix,
            base_url: source.base_url,
            day_offset: source.day_offset,
            cookie_configured: config.has_cookie(),
        }
    }
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            timezone: config.timezone.clone(),
            storage: SanitizedStorageConfig {
                app_key_configured: !config.storage.app_key.is_empty(),
                app_secret_configured: !config.storage.app_secret.is_empty(),
                refresh_token_configured: !config.storage.refresh_token.is_empty(),
                write_mode: config.storage.write_mode,
                timeout_secs: config.storage.timeout_secs,
            },
            fetcher: config.fetcher.clone(),
            sources: vec![
                SanitizedSourceConfig::new(SourceKind::Nyt, &config.nyt),
                SanitizedSourceConfig::new(SourceKind::Wsj, &config.wsj),
            ],
            failure_policy: config.orchestrator.failure_policy,
        }
    }
}
