// src/ingest/providers/hn_search.rs
use async_trait::async_trait;
use serde::Deserialize;

use crate::ingest::types::{RawItem, SourceDescriptor, SourceError, SourceProvider};

const HN_ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "objectID")]
    object_id: String,
    created_at: Option<String>,
    author: Option<String>,
    points: Option<u64>,
}

/// Search API (Algolia HN) returning recent stories with a points score.
pub struct HnSearchProvider {
    source: SourceDescriptor,
    client: reqwest::Client,
    query: String,
    hits_per_page: u32,
}

impl HnSearchProvider {
    pub fn new(source: SourceDescriptor, client: reqwest::Client) -> Self {
        Self {
            source,
            client,
            query: "AI".to_string(),
            hits_per_page: 30,
        }
    }

    pub fn with_query(mut self, query: &str, hits_per_page: u32) -> Self {
        self.query = query.to_string();
        self.hits_per_page = hits_per_page;
        self
    }

    fn to_item(hit: Hit) -> RawItem {
        let title = hit.title.unwrap_or_default();
        let link = hit
            .url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| format!("{HN_ITEM_URL}{}", hit.object_id));
        RawItem {
            content: format!("{title}\n{link}"),
            title,
            link: Some(link),
            published_at: hit.created_at,
            author_name: hit.author.unwrap_or_else(|| "Anonymous".to_string()),
            author_handle: "HackerNews".to_string(),
            rank_score: hit.points.unwrap_or(0),
        }
    }
}

#[async_trait]
impl SourceProvider for HnSearchProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>, SourceError> {
        let hits = self.hits_per_page.to_string();
        let resp = self
            .client
            .get(&self.source.endpoint)
            .query(&[
                ("query", self.query.as_str()),
                ("tags", "story"),
                ("hitsPerPage", hits.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }
        let body = resp.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&body)
            .map_err(|e| SourceError::Parse(format!("search response: {e}")))?;
        Ok(parsed.hits.into_iter().map(Self::to_item).collect())
    }

    fn descriptor(&self) -> &SourceDescriptor {
        &self.source
    }
}
