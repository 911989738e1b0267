use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for structured overrides, e.g. `CROSSWORD_STORAGE__APP_KEY`.
pub const ENV_PREFIX: &str = "CROSSWORD_";

/// Plain environment names the job has always been configured with.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("DROPBOX_APP_KEY", "storage.app_key"),
    ("DROPBOX_APP_SECRET", "storage.app_secret"),
    ("DROPBOX_REFRESH_TOKEN", "storage.refresh_token"),
    ("NYT_COOKIE", "nyt.cookie"),
    ("DROPBOX_NYTC_PATH", "nyt.dest_prefix"),
    ("DROPBOX_WSJC_PATH", "wsj.dest_prefix"),
];

/// Config path a legacy environment variable maps to.
fn legacy_key(name: &str) -> Option<&'static str> {
    LEGACY_ENV_KEYS
        .iter()
        .find(|(env, _)| env.eq_ignore_ascii_case(name))
        .map(|(_, key)| *key)
}

/// Load configuration from an optional TOML file, then the legacy
/// environment names, then `CROSSWORD_` overrides (later wins).
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config: Config = figment
        .merge(Env::raw().filter_map(|name| legacy_key(name.as_str()).map(Into::into)))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
