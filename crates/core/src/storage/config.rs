//! Configuration for the Dropbox store.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::WriteMode;

/// Dropbox app credentials and endpoints.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DropboxConfig {
    /// App key (OAuth client id).
    #[serde(default)]
    pub app_key: String,

    /// App secret (OAuth client secret).
    #[serde(default)]
    pub app_secret: String,

    /// Long-lived refresh token exchanged for short-lived access tokens.
    #[serde(default)]
    pub refresh_token: String,

    /// Conflict handling for uploads.
    #[serde(default)]
    pub write_mode: WriteMode,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// OAuth host.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// RPC endpoint host (metadata lookups).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Content endpoint host (uploads).
    #[serde(default = "default_content_url")]
    pub content_url: String,
}

fn default_timeout() -> u64 {
    120
}

fn default_auth_url() -> String {
    "https://api.dropbox.com".to_string()
}

fn default_api_url() -> String {
    "https://api.dropboxapi.com".to_string()
}

fn default_content_url() -> String {
    "https://content.dropboxapi.com".to_string()
}

impl Default for DropboxConfig {
    fn default() -> Self {
        Self {
            app_key: String::new(),
            app_secret: String::new(),
            refresh_token: String::new(),
            write_mode: WriteMode::default(),
            timeout_secs: default_timeout(),
            auth_url: default_auth_url(),
            api_url: default_api_url(),
            content_url: default_content_url(),
        }
    }
}

impl DropboxConfig {
    pub fn new(
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            refresh_token: refresh_token.into(),
            ..Default::default()
        }
    }

    /// Points every endpoint at one host (useful for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.auth_url = url.clone();
        self.api_url = url.clone();
        self.content_url = url;
        self
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    /// Whether all three credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.app_key.is_empty() && !self.app_secret.is_empty() && !self.refresh_token.is_empty()
    }
}

impl fmt::Debug for DropboxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropboxConfig")
            .field("app_key", &self.app_key)
            .field("app_secret_configured", &!self.app_secret.is_empty())
            .field("refresh_token_configured", &!self.refresh_token.is_empty())
            .field("write_mode", &self.write_mode)
            .field("timeout_secs", &self.timeout_secs)
            .field("auth_url", &self.auth_url)
            .field("api_url", &self.api_url)
            .field("content_url", &self.content_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DropboxConfig::default();
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.write_mode, WriteMode::Add);
        assert_eq!(config.api_url, "https://api.dropboxapi.com");
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = DropboxConfig::new("key", "very-secret", "refresh-me");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("key"));
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("refresh-me"));
        assert!(config.has_credentials());
    }

    #[test]
    fn test_deserialize_write_mode() {
        let config: DropboxConfig = toml::from_str(
            r#"
            app_key = "k"
            app_secret = "s"
            refresh_token = "r"
            write_mode = "overwrite"
            "#,
        )
        .unwrap();
        assert_eq!(config.write_mode, WriteMode::Overwrite);
        assert_eq!(config.content_url, "https://content.dropboxapi.com");
    }
}
