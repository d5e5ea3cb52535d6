// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use feed_digest::enrich::{TranslateError, Translator};
use feed_digest::ingest::types::{RawItem, SourceDescriptor, SourceError, SourceProvider};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn item(title: &str, published: DateTime<Utc>) -> RawItem {
    RawItem {
        title: title.to_string(),
        content: format!("<p>{title}. More details follow here.</p>"),
        link: Some(format!("https://example.test/{}", title.replace(' ', "-"))),
        published_at: Some(ts(published)),
        author_name: "Mock".into(),
        author_handle: "Mock".into(),
        rank_score: 0,
    }
}

/// Returns a fixed list (or a failure) after an optional delay; counts calls.
pub struct MockSource {
    desc: SourceDescriptor,
    items: Option<Vec<RawItem>>,
    delay: std::time::Duration,
    pub calls: AtomicUsize,
}

impl MockSource {
    pub fn ok(name: &str, items: Vec<RawItem>) -> Self {
        Self {
            desc: SourceDescriptor::feed(name, format!("mock://{name}")),
            items: Some(items),
            delay: std::time::Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            items: None,
            ..Self::ok(name, vec![])
        }
    }

    pub fn slow(mut self, delay: std::time::Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceProvider for MockSource {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.items
            .clone()
            .ok_or_else(|| SourceError::Parse("mock source exploded".into()))
    }

    fn descriptor(&self) -> &SourceDescriptor {
        &self.desc
    }
}

/// Prefixes the target language: "zh-CN: <text>".
pub struct EchoTranslator;

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, text: &str, _from: &str, to: &str) -> Result<String, TranslateError> {
        Ok(format!("{to}: {text}"))
    }
    fn name(&self) -> &'static str {
        "echo"
    }
}

pub struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(&self, _: &str, _: &str, _: &str) -> Result<String, TranslateError> {
        Err(TranslateError::Rejected {
            status: "429".into(),
            detail: "quota exceeded".into(),
        })
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

pub fn hours_ago(now: DateTime<Utc>, h: i64) -> DateTime<Utc> {
    now - Duration::hours(h)
}
