//! Mock fetcher for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, Fetcher, Payload};
use crate::source::SourceRequest;

/// Mock implementation of the Fetcher trait.
///
/// Responses are scripted per URL. Unscripted URLs fall back to a
/// configurable default, `NotYetAvailable { status: 404 }` unless changed.
///
/// # Example
///
/// ```rust,ignore
/// use crossword_core::testing::MockFetcher;
///
/// let fetcher = MockFetcher::new();
/// fetcher.set_payload(&request.url, b"%PDF-1.7".to_vec()).await;
///
/// let payload = fetcher.fetch(&request).await?;
/// assert_eq!(fetcher.fetch_count().await, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, Result<Payload, FetchError>>>>,
    fallback: Arc<RwLock<Result<Payload, FetchError>>>,
    requests: Arc<RwLock<Vec<SourceRequest>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            fallback: Arc::new(RwLock::new(Err(FetchError::NotYetAvailable { status: 404 }))),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Makes `url` return `bytes`.
    pub async fn set_payload(&self, url: &str, bytes: impl Into<Vec<u8>>) {
        self.set_response(url, Ok(Payload::new(bytes))).await;
    }

    /// Makes `url` fail with `error`.
    pub async fn set_error(&self, url: &str, error: FetchError) {
        self.set_response(url, Err(error)).await;
    }

    pub async fn set_response(&self, url: &str, response: Result<Payload, FetchError>) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), response);
    }

    /// Response for any URL without a scripted one.
    pub async fn set_fallback(&self, response: Result<Payload, FetchError>) {
        *self.fallback.write().await = response;
    }

    /// Every request received, in order.
    pub async fn recorded_requests(&self) -> Vec<SourceRequest> {
        self.requests.read().await.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn clear_recorded_requests(&self) {
        self.requests.write().await.clear();
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, request: &SourceRequest) -> Result<Payload, FetchError> {
        self.requests.write().await.push(request.clone());

        if let Some(response) = self.responses.read().await.get(&request.url) {
            return response.clone();
        }
        self.fallback.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PublishDate;

    fn request(url: &str) -> SourceRequest {
        SourceRequest {
            url: url.to_string(),
            headers: vec![],
            date: PublishDate::from_ymd(2024, 3, 15).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_scripted_and_fallback_responses() {
        let fetcher = MockFetcher::new();
        fetcher.set_payload("https://a/x.pdf", b"%PDF".to_vec()).await;

        assert!(fetcher.fetch(&request("https://a/x.pdf")).await.is_ok());
        assert_eq!(
            fetcher.fetch(&request("https://a/y.pdf")).await,
            Err(FetchError::NotYetAvailable { status: 404 })
        );

        fetcher.set_fallback(Err(FetchError::Timeout)).await;
        assert_eq!(
            fetcher.fetch(&request("https://a/z.pdf")).await,
            Err(FetchError::Timeout)
        );
        assert_eq!(fetcher.fetch_count().await, 3);
    }
}
