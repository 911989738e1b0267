//! Configuration for the HTTP fetcher.

use serde::{Deserialize, Serialize};

/// Configuration for [`HttpFetcher`](super::HttpFetcher).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// TCP/TLS connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every download.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("crossword-sync/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetcherConfig {
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetcherConfig::default();
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.connect_timeout_secs, 15);
        assert!(config.user_agent.starts_with("crossword-sync/"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: FetcherConfig = toml::from_str("timeout_secs = 5").unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 15);
    }
}
