// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod config;
pub mod enrich;
pub mod ingest;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod select;

// Delivery collaborators
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{aggregate, SortKey};
pub use crate::config::DigestConfig;
pub use crate::enrich::{EnrichedItem, Enricher, TranslationState, Translator};
pub use crate::ingest::types::{RawItem, SourceDescriptor, SourceKind, SourceProvider};
pub use crate::notify::Deliverer;
pub use crate::pipeline::Pipeline;
pub use crate::select::Selector;

use std::sync::Arc;

/// Wire the production collaborators (HTTP sources, MyMemory) from a config.
pub fn build_pipeline(cfg: DigestConfig) -> anyhow::Result<Pipeline> {
    let client = ingest::providers::http_client(&cfg.fetch)?;
    let providers = ingest::providers::build_providers(&cfg.sources, &cfg.fetch, &client);
    let translator = enrich::MyMemoryTranslator::from_settings(&cfg.translate)?;
    let enricher = Enricher::new(Arc::new(translator), &cfg.translate);
    Ok(Pipeline::new(cfg, providers, enricher))
}
