//! Fetcher module for downloading puzzle files from upstream sources.
//!
//! A fetch is a single GET with redirects disabled. A 200 PDF response
//! yields the whole body as a [`Payload`]. Any other status means the puzzle
//! is not out yet and comes back as the benign [`FetchError::NotYetAvailable`];
//! a 200 that is not a PDF comes back as the benign [`FetchError::NotPdf`].
//! Only connection-level failures and timeouts are real errors.

mod config;
mod error;
mod http;
mod traits;
mod types;

pub use config::FetcherConfig;
pub use error::FetchError;
pub use http::HttpFetcher;
pub use traits::Fetcher;
pub use types::Payload;
