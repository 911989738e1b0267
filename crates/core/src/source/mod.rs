//! Content sources and the pure resolvers built on them.
//!
//! A [`ContentSource`] is static configuration: which upstream provider,
//! where its files go, and how far its puzzle date is shifted from the run
//! date. [`resolve`] turns it into a download request and
//! [`destination_key`] into the storage path for that day. Neither does I/O.

mod resolver;
mod types;

pub use resolver::{destination_key, effective_date, resolve};
pub use types::{ContentSource, PublishDate, RemoteKey, SourceKind, SourceRequest};
