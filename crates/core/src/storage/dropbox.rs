//! Dropbox HTTP API v2 store.
//!
//! Access tokens are obtained lazily from the long-lived refresh token on
//! the first call and cached until shortly before they expire.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::config::DropboxConfig;
use super::content_hash::content_hash;
use super::error::StorageError;
use super::traits::ObjectStore;
use super::types::{ObjectMetadata, UploadReceipt, WriteMode};
use crate::fetcher::Payload;
use crate::source::RemoteKey;

/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the token response omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 4 * 60 * 60;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
struct MetadataArg<'a> {
    path: &'a str,
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    #[serde(default)]
    path_display: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    content_hash: Option<String>,
}

#[derive(Debug, Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: WriteMode,
    autorename: bool,
    mute: bool,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    path_display: String,
    size: u64,
    content_hash: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error_summary: String,
}

/// Dropbox-backed [`ObjectStore`].
pub struct DropboxStore {
    client: Client,
    config: DropboxConfig,
    token: RwLock<Option<AccessToken>>,
}

impl DropboxStore {
    /// Creates a store. No network traffic happens until the first call.
    pub fn new(config: DropboxConfig) -> Result<Self, StorageError> {
        if !config.has_credentials() {
            return Err(StorageError::NotConfigured(
                "app key, app secret and refresh token are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorageError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            token: RwLock::new(None),
        })
    }

    /// Returns a usable access token, refreshing it if needed.
    async fn access_token(&self) -> Result<String, StorageError> {
        {
            let token = self.token.read().await;
            if let Some(token) = token.as_ref().filter(|t| t.is_fresh()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.refresh_access_token().await?;
        let value = token.value.clone();
        *self.token.write().await = Some(token);
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }

    async fn refresh_access_token(&self) -> Result<AccessToken, StorageError> {
        let url = format!("{}/oauth2/token", self.config.auth_url.trim_end_matches('/'));
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.config.refresh_token.as_str()),
            ("client_id", self.config.app_key.as_str()),
            ("client_secret", self.config.app_secret.as_str()),
        ];

        debug!("Refreshing Dropbox access token");

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(StorageError::from_reqwest)?;

        let status = response.status();
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Credential(format!(
                "token refresh rejected (HTTP {}): {}",
                status.as_u16(),
                snippet(&body)
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Parse(format!("token response: {}", e)))?;

        let lifetime = token.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        info!(expires_in_secs = lifetime, "Obtained Dropbox access token");

        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }

    /// Maps a 401 to a credential error and drops the cached token.
    async fn unauthorized(&self, body: &str) -> StorageError {
        self.invalidate_token().await;
        StorageError::Credential(snippet(body))
    }
}

#[async_trait]
impl ObjectStore for DropboxStore {
    fn name(&self) -> &str {
        "dropbox"
    }

    async fn metadata(&self, key: &RemoteKey) -> Result<Option<ObjectMetadata>, StorageError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/2/files/get_metadata",
            self.config.api_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&MetadataArg { path: key.as_str() })
            .send()
            .await
            .map_err(StorageError::from_reqwest)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let meta: MetadataResponse = response
                    .json()
                    .await
                    .map_err(|e| StorageError::Parse(format!("metadata response: {}", e)))?;
                Ok(Some(ObjectMetadata {
                    path: meta.path_display.unwrap_or_else(|| key.to_string()),
                    size: meta.size,
                    content_hash: meta.content_hash,
                }))
            }
            StatusCode::CONFLICT => {
                let body = response.text().await.unwrap_or_default();
                let summary = serde_json::from_str::<ApiErrorResponse>(&body)
                    .map(|e| e.error_summary)
                    .unwrap_or_default();
                if summary.starts_with("path/not_found") {
                    debug!(key = %key, "Object not found");
                    Ok(None)
                } else {
                    Err(StorageError::Api {
                        status: status.as_u16(),
                        message: snippet(&body),
                    })
                }
            }
            StatusCode::UNAUTHORIZED => {
                let body = response.text().await.unwrap_or_default();
                Err(self.unauthorized(&body).await)
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(StorageError::Api {
                    status: status.as_u16(),
                    message: snippet(&body),
                })
            }
        }
    }

    async fn upload(
        &self,
        key: &RemoteKey,
        payload: Payload,
    ) -> Result<UploadReceipt, StorageError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/2/files/upload",
            self.config.content_url.trim_end_matches('/')
        );
        let arg = header_safe_json(&UploadArg {
            path: key.as_str(),
            mode: self.config.write_mode,
            autorename: false,
            mute: false,
        })?;

        let local_hash = content_hash(payload.as_bytes());
        let size = payload.len();

        debug!(key = %key, bytes = size, "Uploading");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .header("Content-Type", "application/octet-stream")
            .header("Dropbox-API-Arg", arg)
            .body(payload.into_vec())
            .send()
            .await
            .map_err(StorageError::from_reqwest)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(self.unauthorized(&body).await);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Parse(format!("upload response: {}", e)))?;

        if uploaded.content_hash != local_hash {
            warn!(
                key = %key,
                local = %local_hash,
                remote = %uploaded.content_hash,
                "Content hash mismatch after upload"
            );
        }

        Ok(UploadReceipt {
            path: uploaded.path_display,
            size: uploaded.size,
            content_hash: uploaded.content_hash,
        })
    }
}

/// Serializes `value` as JSON that is safe inside an HTTP header: DEL and
/// every non-ASCII character are written as `\uXXXX` escapes.
fn header_safe_json<T: Serialize>(value: &T) -> Result<String, StorageError> {
    let json = serde_json::to_string(value)
        .map_err(|e| StorageError::Parse(format!("upload argument: {}", e)))?;

    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    Ok(out)
}

fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
