// src/ingest/registry.rs
//! Built-in source list, used when the configuration does not name its own.

use crate::ingest::types::SourceDescriptor;

pub const HN_SEARCH_ENDPOINT: &str = "https://hn.algolia.com/api/v1/search_by_date";

/// Hacker News search plus AI company blogs and tech-news feeds.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::api("Hacker News", HN_SEARCH_ENDPOINT),
        // Company blogs
        SourceDescriptor::feed("OpenAI Blog", "https://openai.com/blog/rss.xml"),
        SourceDescriptor::feed("Anthropic Blog", "https://www.anthropic.com/rss.xml"),
        SourceDescriptor::feed("DeepMind Blog", "https://deepmind.google/blog/rss/"),
        SourceDescriptor::feed("Google AI Blog", "http://googleaiblog.blogspot.com/atom.xml"),
        SourceDescriptor::feed("Meta AI Blog", "https://ai.meta.com/blog/rss/"),
        // News
        SourceDescriptor::feed(
            "MIT News - AI",
            "https://news.mit.edu/rss/topic/artificial-intelligence2",
        ),
        SourceDescriptor::feed("Wired AI", "https://www.wired.com/feed/category/ai/latest/rss"),
        SourceDescriptor::feed("The Verge AI", "https://www.theverge.com/rss/ai/index.xml"),
        SourceDescriptor::feed(
            "TechCrunch AI",
            "https://techcrunch.com/category/artificial-intelligence/feed/",
        ),
    ]
}
