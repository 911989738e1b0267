//! In-memory object store for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::fetcher::Payload;
use crate::source::RemoteKey;
use crate::storage::{content_hash, ObjectMetadata, ObjectStore, StorageError, UploadReceipt};

/// A recorded upload for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub key: RemoteKey,
    pub payload: Payload,
    pub success: bool,
}

/// Mock implementation of the ObjectStore trait.
///
/// Provides controllable behavior for testing:
/// - Pre-seed objects so existence checks find them
/// - Track metadata lookups and uploads for assertions
/// - Fail the next upload, or every metadata lookup
#[derive(Debug, Clone)]
pub struct MockObjectStore {
    objects: Arc<RwLock<HashMap<RemoteKey, Vec<u8>>>>,
    lookups: Arc<RwLock<Vec<RemoteKey>>>,
    uploads: Arc<RwLock<Vec<RecordedUpload>>>,
    next_upload_error: Arc<RwLock<Option<StorageError>>>,
    metadata_error: Arc<RwLock<Option<StorageError>>>,
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
            uploads: Arc::new(RwLock::new(Vec::new())),
            next_upload_error: Arc::new(RwLock::new(None)),
            metadata_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Stores an object directly, bypassing upload tracking.
    pub async fn insert(&self, key: RemoteKey, bytes: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(key, bytes.into());
    }

    pub async fn contains(&self, key: &RemoteKey) -> bool {
        self.objects.read().await.contains_key(key)
    }

    pub async fn object(&self, key: &RemoteKey) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }

    /// Keys passed to `metadata`, in order.
    pub async fn recorded_lookups(&self) -> Vec<RemoteKey> {
        self.lookups.read().await.clone()
    }

    pub async fn recorded_uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.read().await.clone()
    }

    pub async fn upload_count(&self) -> usize {
        self.uploads.read().await.len()
    }

    /// Configure the next upload to fail with the given error.
    pub async fn set_next_upload_error(&self, error: StorageError) {
        *self.next_upload_error.write().await = Some(error);
    }

    /// Make every metadata lookup fail until cleared.
    pub async fn set_metadata_error(&self, error: StorageError) {
        *self.metadata_error.write().await = Some(error);
    }

    pub async fn clear_metadata_error(&self) {
        *self.metadata_error.write().await = None;
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn metadata(&self, key: &RemoteKey) -> Result<Option<ObjectMetadata>, StorageError> {
        self.lookups.write().await.push(key.clone());

        if let Some(error) = self.metadata_error.read().await.clone() {
            return Err(error);
        }

        Ok(self.objects.read().await.get(key).map(|bytes| ObjectMetadata {
            path: key.to_string(),
            size: Some(bytes.len() as u64),
            content_hash: Some(content_hash(bytes)),
        }))
    }

    async fn upload(
        &self,
        key: &RemoteKey,
        payload: Payload,
    ) -> Result<UploadReceipt, StorageError> {
        if let Some(error) = self.next_upload_error.write().await.take() {
            self.uploads.write().await.push(RecordedUpload {
                key: key.clone(),
                payload,
                success: false,
            });
            return Err(error);
        }

        let receipt = UploadReceipt {
            path: key.to_string(),
            size: payload.len() as u64,
            content_hash: content_hash(payload.as_bytes()),
        };

        self.objects
            .write()
            .await
            .insert(key.clone(), payload.as_bytes().to_vec());
        self.uploads.write().await.push(RecordedUpload {
            key: key.clone(),
            payload,
            success: true,
        });

        Ok(receipt)
    }
}
