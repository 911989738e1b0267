//! Trait definitions for the fetcher module.

use async_trait::async_trait;

use super::error::FetchError;
use super::types::Payload;
use crate::source::SourceRequest;

/// Downloads one resolved source request.
///
/// Implementations make at most one attempt per call.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Fetches the full body of `request`.
    async fn fetch(&self, request: &SourceRequest) -> Result<Payload, FetchError>;
}
