//! Types shared by the source and destination resolvers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A calendar day in the reference time zone.
///
/// Carries no time-of-day component; every URL and key derived for a run
/// starts from the same `PublishDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublishDate(NaiveDate);

impl PublishDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Builds a date from its parts, or `None` if they do not name a real day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The calendar day `instant` falls on in `tz`.
    pub fn from_instant(instant: DateTime<Utc>, tz: Tz) -> Self {
        Self(instant.with_timezone(&tz).date_naive())
    }

    /// Today's date in `tz`, read from the wall clock.
    pub fn today_in(tz: Tz) -> Self {
        Self::from_instant(Utc::now(), tz)
    }

    /// Shifts the date by a signed number of days, clamping at the limits
    /// of the calendar instead of overflowing.
    pub fn offset_days(self, days: i64) -> Self {
        match TimeDelta::try_days(days).and_then(|delta| self.0.checked_add_signed(delta)) {
            Some(date) => Self(date),
            None if days < 0 => Self(NaiveDate::MIN),
            None => Self(NaiveDate::MAX),
        }
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for PublishDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}

/// Upstream providers with a known URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// New York Times print edition, behind a subscriber cookie.
    Nyt,
    /// Wall Street Journal, publicly hosted.
    Wsj,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nyt => "nyt",
            Self::Wsj => "wsj",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured upstream source.
#[derive(Clone, PartialEq, Eq)]
pub struct ContentSource {
    /// Name used in logs and reports.
    pub name: String,
    /// Selects the URL template.
    pub kind: SourceKind,
    /// Scheme and host of the download server, without a trailing path.
    pub base_url: String,
    /// Storage folder the daily files land in.
    pub dest_prefix: String,
    /// Days added to the run date before building URL and key.
    pub day_offset: i64,
    /// Session cookie sent with the download request.
    pub cookie: Option<String>,
}

impl ContentSource {
    pub fn new(kind: SourceKind, dest_prefix: impl Into<String>) -> Self {
        Self {
            name: kind.as_str().to_string(),
            kind,
            base_url: kind.default_base_url().to_string(),
            dest_prefix: dest_prefix.into(),
            day_offset: kind.default_day_offset(),
            cookie: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_day_offset(mut self, days: i64) -> Self {
        self.day_offset = days;
        self
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }
}

// Cookie is a secret; keep it out of logs.
impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentSource")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("dest_prefix", &self.dest_prefix)
            .field("day_offset", &self.day_offset)
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A fully resolved download request.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// The date whose puzzle this request fetches (after the day offset).
    pub date: PublishDate,
}

impl SourceRequest {
    /// Whether the request carries a session cookie.
    pub fn has_cookie(&self) -> bool {
        self.headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("cookie"))
    }
}

impl fmt::Debug for SourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("cookie") {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("SourceRequest")
            .field("url", &self.url)
            .field("headers", &headers)
            .field("date", &self.date)
            .finish()
    }
}

/// Storage path for one (source, date) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteKey(String);

impl RemoteKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
