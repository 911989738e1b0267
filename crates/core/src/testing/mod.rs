//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the fetcher and storage
//! traits, so the whole pipeline can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use crossword_core::testing::{fixtures, MockFetcher, MockObjectStore};
//!
//! let fetcher = MockFetcher::new();
//! let store = MockObjectStore::new();
//!
//! let source = fixtures::nyt_source();
//! let request = resolve(&source, fixtures::march_15());
//! fetcher.set_payload(&request.url, fixtures::pdf_bytes()).await;
//! ```

mod mock_fetcher;
mod mock_store;

pub use mock_fetcher::MockFetcher;
pub use mock_store::{MockObjectStore, RecordedUpload};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::source::{ContentSource, PublishDate, SourceKind};

    /// Friday, 2024-03-15.
    pub fn march_15() -> PublishDate {
        PublishDate::from_ymd(2024, 3, 15).expect("valid date")
    }

    /// NYT source with a cookie and the default (zero) day offset.
    pub fn nyt_source() -> ContentSource {
        ContentSource::new(SourceKind::Nyt, "/Crosswords/NYT").with_cookie("NYT-S=test-cookie")
    }

    /// WSJ source with the default +1 day offset.
    pub fn wsj_source() -> ContentSource {
        ContentSource::new(SourceKind::Wsj, "/Crosswords/WSJ")
    }

    /// A small body that starts with the PDF magic bytes.
    pub fn pdf_bytes() -> Vec<u8> {
        let mut bytes = vec![0x25, 0x50, 0x44, 0x46];
        bytes.extend_from_slice(b"-1.7\n% crossword\n%%EOF\n");
        bytes
    }
}
