//! Types for the storage module.

use serde::{Deserialize, Serialize};

/// What the backend knows about an existing object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Path as stored by the backend (display casing).
    pub path: String,
    pub size: Option<u64>,
    pub content_hash: Option<String>,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub path: String,
    pub size: u64,
    /// Backend-computed integrity token. Opaque; log it, don't parse it.
    pub content_hash: String,
}

/// How an upload treats an object already at the same path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Fail on conflict (backend default).
    #[default]
    Add,
    /// Replace whatever is there.
    Overwrite,
}
