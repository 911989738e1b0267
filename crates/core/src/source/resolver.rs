//! Pure mapping from (source, date) to download request and storage key.

use super::types::{ContentSource, PublishDate, RemoteKey, SourceKind, SourceRequest};

const NYT_BASE_URL: &str = "https://www.nytimes.com";
const NYT_REFERER: &str = "https://www.nytimes.com/crosswords/archive/daily";
const WSJ_BASE_URL: &str = "https://s.wsj.net";

impl SourceKind {
    /// Download host used when the configuration does not override it.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Nyt => NYT_BASE_URL,
            Self::Wsj => WSJ_BASE_URL,
        }
    }

    /// WSJ posts the next day's puzzle the evening before, so the job
    /// grabs "tomorrow" for it.
    pub fn default_day_offset(&self) -> i64 {
        match self {
            Self::Nyt => 0,
            Self::Wsj => 1,
        }
    }
}

/// The date whose puzzle `source` publishes for a run on `date`.
pub fn effective_date(source: &ContentSource, date: PublishDate) -> PublishDate {
    date.offset_days(source.day_offset)
}

/// Builds the download request for `source` on the run date `date`.
pub fn resolve(source: &ContentSource, date: PublishDate) -> SourceRequest {
    let date = effective_date(source, date);
    let base = source.base_url.trim_end_matches('/');

    match source.kind {
        SourceKind::Nyt => {
            let mut headers = vec![("Referer".to_string(), NYT_REFERER.to_string())];
            if let Some(cookie) = &source.cookie {
                headers.push(("Cookie".to_string(), cookie.clone()));
            }
            SourceRequest {
                url: format!(
                    "{}/svc/crosswords/v2/puzzle/print/{}.pdf",
                    base,
                    date.naive().format("%b%d%y")
                ),
                headers,
                date,
            }
        }
        SourceKind::Wsj => SourceRequest {
            url: format!(
                "{}/public/resources/documents/XWD{}.pdf",
                base,
                date.naive().format("%m%d%Y")
            ),
            headers: Vec::new(),
            date,
        },
    }
}

/// Storage key for `source` on the run date `date`.
///
/// Uses the same effective date as [`resolve`], so the stored name always
/// matches the puzzle that was downloaded.
pub fn destination_key(source: &ContentSource, date: PublishDate) -> RemoteKey {
    let date = effective_date(source, date);
    RemoteKey::new(format!(
        "{}/{}-crossword.pdf",
        source.dest_prefix.trim_end_matches('/'),
        date.naive().format("%Y-%m-%d-%a")
    ))
}
