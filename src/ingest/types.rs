// src/ingest/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::{OffsetDateTime, UtcOffset};

/// How a source is fetched and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// RSS / Atom document.
    Feed,
    /// JSON search API returning ranked stories.
    Api,
}

/// Static description of one external source. Shared read-only by fetch tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub endpoint: String,
    pub kind: SourceKind,
}

impl SourceDescriptor {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            kind,
        }
    }

    pub fn feed(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new(name, endpoint, SourceKind::Feed)
    }

    pub fn api(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new(name, endpoint, SourceKind::Api)
    }

    /// Author handle derived from the display name ("Wired AI" -> "WiredAI").
    pub fn handle(&self) -> String {
        self.name.split_whitespace().collect()
    }
}

/// One entry as produced by a source, before any filtering.
///
/// `title` and `content` are plain strings with empty defaults so downstream
/// string handling never has to deal with a missing value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub title: String,
    pub content: String,
    pub link: Option<String>,
    /// Timestamp text exactly as the source reported it.
    pub published_at: Option<String>,
    pub author_name: String,
    pub author_handle: String,
    pub rank_score: u64,
}

impl RawItem {
    /// Parsed publish time; `None` when absent or unparseable.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_deref().and_then(parse_timestamp)
    }
}

/// Parse RFC 3339 (`2025-09-06T09:00:00Z`) or RFC 2822 (`Sat, 06 Sep 2025 09:00:00 GMT`).
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if ts.is_empty() {
        return None;
    }
    let odt = OffsetDateTime::parse(ts, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(ts, &Rfc2822))
        .ok()?
        .to_offset(UtcOffset::UTC);
    DateTime::from_timestamp(odt.unix_timestamp(), odt.nanosecond())
}

/// Why a single source contributed nothing.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("parse: {0}")]
    Parse(String),
    #[error("task failed: {0}")]
    Join(String),
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>, SourceError>;
    fn descriptor(&self) -> &SourceDescriptor;

    fn name(&self) -> &str {
        &self.descriptor().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_both_timestamp_styles() {
        let want = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-09-06T09:00:00Z"), Some(want));
        assert_eq!(parse_timestamp("Sat, 06 Sep 2025 09:00:00 +0000"), Some(want));
        assert_eq!(parse_timestamp("Sat, 06 Sep 2025 11:00:00 +0200"), Some(want));
    }

    #[test]
    fn keeps_sub_second_precision() {
        let ts = parse_timestamp("2025-09-06T09:00:00.000001Z").unwrap();
        assert_eq!(ts.timestamp_subsec_micros(), 1);
    }

    #[test]
    fn garbage_and_empty_are_none() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday-ish"), None);
        let item = RawItem::default();
        assert_eq!(item.published(), None);
    }

    #[test]
    fn handle_strips_whitespace() {
        let d = SourceDescriptor::feed("MIT News - AI", "https://example.test/rss");
        assert_eq!(d.handle(), "MITNews-AI");
    }
}
