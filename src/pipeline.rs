// src/pipeline.rs
//! Registry -> fetch (fan-out) -> aggregate -> select -> normalize -> enrich -> deliver.

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::gauge;
use std::sync::Arc;

use crate::aggregate::aggregate;
use crate::config::DigestConfig;
use crate::enrich::{EnrichedItem, Enricher};
use crate::ingest::{self, types::SourceProvider};
use crate::notify::Deliverer;
use crate::select::{DedupPolicy, Selector};

/// One run of the digest, built from an explicit config value.
pub struct Pipeline {
    cfg: DigestConfig,
    providers: Vec<Arc<dyn SourceProvider>>,
    enricher: Enricher,
}

impl Pipeline {
    pub fn new(
        cfg: DigestConfig,
        providers: Vec<Arc<dyn SourceProvider>>,
        enricher: Enricher,
    ) -> Self {
        Self {
            cfg,
            providers,
            enricher,
        }
    }

    pub fn config(&self) -> &DigestConfig {
        &self.cfg
    }

    fn selector(&self) -> Selector {
        Selector::new(self.cfg.max_items)
            .with_dedup(DedupPolicy {
                field: self.cfg.select.dedup_field,
                prefix_chars: self.cfg.select.prefix_chars,
            })
            .with_ranking(self.cfg.select.ranking)
    }

    /// Run every stage up to (not including) delivery.
    pub async fn run(&self, now: DateTime<Utc>) -> Vec<EnrichedItem> {
        let raw = ingest::fetch_all(&self.providers, self.cfg.fetch.timeout()).await;
        let recent = aggregate(raw, now, self.cfg.window(), self.cfg.sort);
        let selected = self.selector().select(recent);

        let prepared: Vec<EnrichedItem> = selected
            .into_iter()
            .map(|it| EnrichedItem::prepare(it, &self.cfg.normalize))
            .collect();

        let out = self.enricher.enrich(prepared).await;
        gauge!("digest_last_run_ts").set(now.timestamp() as f64);
        out
    }

    /// Run and hand the result to `deliverer`. An empty result is still delivered.
    pub async fn run_and_deliver(
        &self,
        now: DateTime<Utc>,
        deliverer: &dyn Deliverer,
    ) -> Result<Vec<EnrichedItem>> {
        let items = self.run(now).await;
        if items.is_empty() {
            tracing::info!("no new items; delivering empty digest");
        }
        deliverer.deliver(&items).await?;
        tracing::info!(items = items.len(), via = deliverer.name(), "digest delivered");
        Ok(items)
    }
}
