//! Trait definitions for the storage module.

use async_trait::async_trait;
use tracing::warn;

use super::error::StorageError;
use super::types::{ObjectMetadata, UploadReceipt};
use crate::fetcher::Payload;
use crate::source::RemoteKey;

/// A remote file store that can look up and receive objects by key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the name of this store implementation.
    fn name(&self) -> &str;

    /// Looks up `key` without transferring content.
    ///
    /// `Ok(None)` means the backend positively reported "not found".
    async fn metadata(&self, key: &RemoteKey) -> Result<Option<ObjectMetadata>, StorageError>;

    /// Whether an object exists at `key`.
    ///
    /// A failed lookup counts as absent: an extra upload is cheaper than a
    /// missed day.
    async fn exists(&self, key: &RemoteKey) -> bool {
        match self.metadata(key).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(key = %key, error = %e, "Existence check failed, treating as absent");
                false
            }
        }
    }

    /// Writes `payload` at `key`.
    async fn upload(&self, key: &RemoteKey, payload: Payload)
        -> Result<UploadReceipt, StorageError>;
}
