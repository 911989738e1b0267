//! Storage module: existence checks and uploads against a remote file store.
//!
//! [`ObjectStore`] is the seam the orchestrator talks to. [`DropboxStore`]
//! implements it over the Dropbox HTTP API; `crate::testing` has an
//! in-memory version.
//!
//! # Example
//!
//! ```ignore
//! use crossword_core::storage::{DropboxConfig, DropboxStore, ObjectStore};
//!
//! let store = DropboxStore::new(DropboxConfig::new(key, secret, refresh))?;
//! if !store.exists(&key).await {
//!     let receipt = store.upload(&key, payload).await?;
//!     println!("stored {}", receipt.content_hash);
//! }
//! ```

mod config;
mod content_hash;
mod dropbox;
mod error;
mod traits;
mod types;

pub use config::DropboxConfig;
pub use content_hash::content_hash;
pub use dropbox::DropboxStore;
pub use error::StorageError;
pub use traits::ObjectStore;
pub use types::{ObjectMetadata, UploadReceipt, WriteMode};
