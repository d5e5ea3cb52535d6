// src/ingest/providers/feed.rs
use async_trait::async_trait;
use std::sync::Arc;

use crate::ingest::parse::{FeedEntry, FeedParser};
use crate::ingest::types::{RawItem, SourceDescriptor, SourceError, SourceProvider};

/// Generic RSS/Atom source. Keeps the first `max_entries` entries in document order.
pub struct FeedProvider {
    source: SourceDescriptor,
    client: reqwest::Client,
    parser: Arc<dyn FeedParser>,
    max_entries: usize,
}

impl FeedProvider {
    pub fn new(
        source: SourceDescriptor,
        client: reqwest::Client,
        parser: Arc<dyn FeedParser>,
    ) -> Self {
        Self {
            source,
            client,
            parser,
            max_entries: 10,
        }
    }

    pub fn with_max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    fn to_item(&self, entry: FeedEntry) -> RawItem {
        RawItem {
            title: entry.title.unwrap_or_default(),
            content: entry.content.unwrap_or_default(),
            link: entry.link.or(entry.id),
            published_at: entry.published,
            author_name: self.source.name.clone(),
            author_handle: self.source.handle(),
            rank_score: 0,
        }
    }

    /// Parse an already-downloaded document.
    pub fn items_from_bytes(&self, raw: &[u8]) -> Result<Vec<RawItem>, SourceError> {
        let entries = self.parser.parse(raw)?;
        if entries.is_empty() {
            tracing::info!(source = %self.source.name, "no items in feed");
        }
        Ok(entries
            .into_iter()
            .take(self.max_entries)
            .map(|e| self.to_item(e))
            .collect())
    }
}

#[async_trait]
impl SourceProvider for FeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>, SourceError> {
        let resp = self.client.get(&self.source.endpoint).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }
        let body = resp.bytes().await?;
        self.items_from_bytes(&body)
    }

    fn descriptor(&self) -> &SourceDescriptor {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse::XmlFeedParser;

    fn provider(max: usize) -> FeedProvider {
        FeedProvider::new(
            SourceDescriptor::feed("Wired AI", "http://unused.test"),
            reqwest::Client::new(),
            Arc::new(XmlFeedParser),
        )
        .with_max_entries(max)
    }

    #[test]
    fn caps_entries_and_fills_author_fields() {
        let items: String = (0..5)
            .map(|i| format!("<item><title>T{i}</title><guid>g{i}</guid></item>"))
            .collect();
        let xml = format!("<rss><channel>{items}</channel></rss>");
        let out = provider(3).items_from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].title, "T0");
        assert_eq!(out[0].link.as_deref(), Some("g0"));
        assert_eq!(out[0].author_name, "Wired AI");
        assert_eq!(out[0].author_handle, "WiredAI");
        assert!(out.iter().all(|i| i.rank_score == 0 && i.content.is_empty()));
    }
}
