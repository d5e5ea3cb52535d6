// src/enrich/mod.rs
//! Sequential, rate-limited translation of the selected items.

pub mod translator;

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{NormalizeSettings, TranslateSettings};
use crate::ingest::types::RawItem;
use crate::normalize::{clean_content, summarize};

pub use translator::{MyMemoryTranslator, TranslateError, Translator};

/// Which derived text gets translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslateField {
    #[default]
    Summary,
    Content,
}

/// Per-item lifecycle: `Pending -> Translating -> Translated | Degraded`.
///
/// `Translating` is held only while the translator call is in flight; every
/// item returned from [`Enricher::enrich`] is `Translated` or `Degraded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TranslationState {
    Pending,
    Translating,
    Translated,
    Degraded { reason: String },
}

/// A selected item with its cleaned text and translation.
///
/// `translated` is always present: the translation, an empty string for empty
/// input, or a visible placeholder when the translator failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedItem {
    pub item: RawItem,
    pub cleaned_content: String,
    pub summary: String,
    pub translated: String,
    pub state: TranslationState,
}

impl EnrichedItem {
    /// Normalizer stage: clean the body and derive a summary from it.
    pub fn prepare(item: RawItem, limits: &NormalizeSettings) -> Self {
        let cleaned_content = clean_content(&item.content, limits.body_max_chars);
        let summary = summarize(&cleaned_content, limits.summary_max_chars);
        Self {
            item,
            cleaned_content,
            summary,
            translated: String::new(),
            state: TranslationState::Pending,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.state, TranslationState::Degraded { .. })
    }

    fn source_text(&self, field: TranslateField) -> &str {
        match field {
            TranslateField::Summary => &self.summary,
            TranslateField::Content => &self.cleaned_content,
        }
    }
}

pub fn failure_placeholder(reason: &str) -> String {
    format!("[translation failed: {reason}]")
}

/// Wait inserted between two consecutive translator calls.
pub trait PacingPolicy: Send + Sync {
    fn delay(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl PacingPolicy for FixedDelay {
    fn delay(&self) -> Duration {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl PacingPolicy for NoDelay {
    fn delay(&self) -> Duration {
        Duration::ZERO
    }
}

pub struct Enricher {
    translator: Arc<dyn Translator>,
    pacing: Arc<dyn PacingPolicy>,
    source_lang: String,
    target_lang: String,
    field: TranslateField,
    max_chars: usize,
    progress_every: usize,
}

impl Enricher {
    pub fn new(translator: Arc<dyn Translator>, settings: &TranslateSettings) -> Self {
        Self {
            translator,
            pacing: Arc::new(FixedDelay(settings.delay())),
            source_lang: settings.source_lang.clone(),
            target_lang: settings.target_lang.clone(),
            field: settings.field,
            max_chars: settings.max_chars,
            progress_every: settings.progress_every.max(1),
        }
    }

    pub fn with_pacing(mut self, pacing: Arc<dyn PacingPolicy>) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    /// Translate every item, one at a time, in order.
    ///
    /// Always returns exactly one item per input. A failed call degrades that
    /// item to a placeholder; nothing is retried.
    pub async fn enrich(&self, items: Vec<EnrichedItem>) -> Vec<EnrichedItem> {
        let total = items.len();
        tracing::info!(
            items = total,
            to = %self.target_lang,
            translator = self.translator.name(),
            "translating"
        );

        let mut queue: VecDeque<EnrichedItem> = items.into();
        let mut out = Vec::with_capacity(total);
        let mut called_before = false;

        while let Some(mut item) = queue.pop_front() {
            let text: String = item
                .source_text(self.field)
                .chars()
                .take(self.max_chars)
                .collect();

            if text.trim().is_empty() {
                item.translated = String::new();
                item.state = TranslationState::Translated;
            } else {
                if called_before {
                    let wait = self.pacing.delay();
                    if !wait.is_zero() {
                        tokio::time::sleep(wait).await;
                    }
                }
                called_before = true;
                self.translate_one(&mut item, &text).await;
            }

            out.push(item);
            if progress_due(out.len(), self.progress_every) {
                tracing::info!(done = out.len(), total, "translation progress");
            }
        }

        let degraded = out.iter().filter(|i| i.is_degraded()).count();
        tracing::info!(total, degraded, "translation completed");
        out
    }

    async fn translate_one(&self, item: &mut EnrichedItem, text: &str) {
        counter!("digest_translations_total").increment(1);
        item.state = TranslationState::Translating;
        match self
            .translator
            .translate(text, &self.source_lang, &self.target_lang)
            .await
        {
            Ok(t) => {
                item.translated = t;
                item.state = TranslationState::Translated;
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(title = %item.item.title, error = %reason, "translation failed");
                counter!("digest_translation_failures_total").increment(1);
                item.translated = failure_placeholder(&reason);
                item.state = TranslationState::Degraded { reason };
            }
        }
    }
}

/// A progress line is due after every `every`-th finished item.
fn progress_due(done: usize, every: usize) -> bool {
    every > 0 && done > 0 && done % every == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Records every text it receives and echoes it back upper-cased.
    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Translator for Recording {
        async fn translate(
            &self,
            text: &str,
            _from: &str,
            _to: &str,
        ) -> Result<String, TranslateError> {
            self.seen.lock().push(text.to_string());
            Ok(text.to_uppercase())
        }
        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn item(content: &str) -> EnrichedItem {
        EnrichedItem::prepare(
            RawItem {
                content: content.into(),
                ..Default::default()
            },
            &NormalizeSettings::default(),
        )
    }

    fn settings() -> TranslateSettings {
        TranslateSettings {
            delay_ms: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_text_skips_the_call() {
        let tr = Arc::new(Recording::default());
        let enr = Enricher::new(tr.clone(), &settings());
        let out = enr.enrich(vec![item(""), item("<p>hello</p>")]).await;
        assert_eq!(out[0].translated, "");
        assert_eq!(out[0].state, TranslationState::Translated);
        assert_eq!(out[1].translated, "HELLO");
        assert_eq!(tr.seen.lock().as_slice(), ["hello"]);
    }

    #[tokio::test]
    async fn long_text_is_capped_before_the_call() {
        let tr = Arc::new(Recording::default());
        let s = TranslateSettings {
            field: TranslateField::Content,
            max_chars: 10,
            ..settings()
        };
        let enr = Enricher::new(tr.clone(), &s);
        enr.enrich(vec![item(&"a".repeat(400))]).await;
        assert_eq!(tr.seen.lock()[0].chars().count(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_only_between_calls() {
        let tr = Arc::new(Recording::default());
        let s = TranslateSettings {
            delay_ms: 500,
            ..Default::default()
        };
        let enr = Enricher::new(tr, &s);
        let t0 = tokio::time::Instant::now();
        enr.enrich(vec![item("a"), item(""), item("b"), item("c")]).await;
        // three calls -> two gaps
        assert_eq!(t0.elapsed(), Duration::from_millis(1000));
    }

    #[test]
    fn progress_every_fifth_item() {
        let due: Vec<usize> = (1..=12).filter(|&n| progress_due(n, 5)).collect();
        assert_eq!(due, [5, 10]);
        assert!(!progress_due(0, 5));
        assert!(!progress_due(3, 0));
    }

    #[test]
    fn default_cadence_is_five() {
        let enr = Enricher::new(Arc::new(Recording::default()), &TranslateSettings::default());
        assert_eq!(enr.progress_every, 5);
    }

    #[tokio::test]
    async fn no_item_is_left_in_flight() {
        let enr = Enricher::new(Arc::new(Recording::default()), &settings());
        let out = enr.enrich(vec![item("one"), item(""), item("two")]).await;
        assert!(out.iter().all(|i| i.state == TranslationState::Translated));
    }
}
