use super::{types::Config, ConfigError};

/// Largest day shift, either direction, a source may apply to the run date.
pub const MAX_DAY_OFFSET: i64 = 7;

/// Validate configuration
/// Currently validates:
/// - Storage credentials are all present
/// - At least one source is enabled
/// - Every enabled source has an absolute destination prefix
/// - Day offsets stay within a week of the run date
/// - Timeouts are non-zero
/// - The time zone is a known IANA name
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if !config.storage.has_credentials() {
        return Err(ConfigError::ValidationError(
            "storage.app_key, storage.app_secret and storage.refresh_token are required \
             (or DROPBOX_APP_KEY, DROPBOX_APP_SECRET, DROPBOX_REFRESH_TOKEN)"
                .to_string(),
        ));
    }

    let sources = config.sources();
    if sources.is_empty() {
        return Err(ConfigError::ValidationError(
            "no sources enabled".to_string(),
        ));
    }

    for source in &sources {
        if source.dest_prefix.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{}.dest_prefix is required",
                source.name
            )));
        }
        if !source.dest_prefix.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "{}.dest_prefix must start with '/': {}",
                source.name, source.dest_prefix
            )));
        }
        if !(-MAX_DAY_OFFSET..=MAX_DAY_OFFSET).contains(&source.day_offset) {
            return Err(ConfigError::ValidationError(format!(
                "{}.day_offset must be between -{} and {}: {}",
                source.name, MAX_DAY_OFFSET, MAX_DAY_OFFSET, source.day_offset
            )));
        }
    }

    if config.fetcher.timeout_secs == 0 || config.fetcher.connect_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fetcher timeouts cannot be 0".to_string(),
        ));
    }
    if config.storage.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "storage.timeout_secs cannot be 0".to_string(),
        ));
    }

    config.timezone()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DropboxConfig;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.storage = DropboxConfig::new("key", "secret", "refresh");
        config.nyt.dest_prefix = "/Crosswords/NYT".to_string();
        config.wsj.dest_prefix = "/Crosswords/WSJ".to_string();
        config
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_missing_credentials_fails() {
        let mut config = valid_config();
        config.storage.refresh_token.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_no_sources_fails() {
        let mut config = valid_config();
        config.nyt.enabled = false;
        config.wsj.enabled = false;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_disabled_source_needs_no_prefix() {
        let mut config = valid_config();
        config.wsj.enabled = false;
        config.wsj.dest_prefix.clear();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_relative_prefix_fails() {
        let mut config = valid_config();
        config.nyt.dest_prefix = "Crosswords/NYT".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("nyt.dest_prefix"));
    }

    #[test]
    fn test_validate_day_offset_range() {
        let mut config = valid_config();
        config.wsj.day_offset = Some(-MAX_DAY_OFFSET);
        assert!(validate_config(&config).is_ok());

        config.wsj.day_offset = Some(200_000_000);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("wsj.day_offset"));

        config.wsj.day_offset = Some(i64::MIN);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = valid_config();
        config.fetcher.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_timezone_fails() {
        let mut config = valid_config();
        config.timezone = "Eastern".to_string();
        assert!(validate_config(&config).is_err());
    }
}
