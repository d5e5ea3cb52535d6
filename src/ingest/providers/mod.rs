// src/ingest/providers/mod.rs
pub mod feed;
pub mod hn_search;

use std::sync::Arc;

use crate::config::FetchSettings;
use crate::ingest::parse::XmlFeedParser;
use crate::ingest::types::{SourceDescriptor, SourceKind, SourceProvider};

pub use feed::FeedProvider;
pub use hn_search::HnSearchProvider;

/// Shared HTTP client for all sources of a run.
pub fn http_client(settings: &FetchSettings) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.clone())
        .connect_timeout(settings.timeout().min(std::time::Duration::from_secs(5)))
        .timeout(settings.timeout())
        .build()
}

/// One provider per descriptor, chosen by `kind`.
pub fn build_providers(
    sources: &[SourceDescriptor],
    settings: &FetchSettings,
    client: &reqwest::Client,
) -> Vec<Arc<dyn SourceProvider>> {
    sources
        .iter()
        .map(|src| -> Arc<dyn SourceProvider> {
            match src.kind {
                SourceKind::Feed => Arc::new(
                    FeedProvider::new(src.clone(), client.clone(), Arc::new(XmlFeedParser))
                        .with_max_entries(settings.max_entries_per_feed),
                ),
                SourceKind::Api => Arc::new(
                    HnSearchProvider::new(src.clone(), client.clone())
                        .with_query(&settings.search_query, settings.search_hits_per_page),
                ),
            }
        })
        .collect()
}
