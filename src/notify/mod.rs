// src/notify/mod.rs
//! Delivery collaborators. They receive the final ordered list verbatim.

pub mod email;

use anyhow::Result;
use std::sync::Mutex;

use crate::enrich::EnrichedItem;

pub use email::EmailDeliverer;

#[async_trait::async_trait]
pub trait Deliverer: Send + Sync {
    /// Must accept an empty slice (rendered as a "no new items" notice).
    async fn deliver(&self, items: &[EnrichedItem]) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Writes the digest to the tracing sink. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDeliverer;

#[async_trait::async_trait]
impl Deliverer for LogDeliverer {
    async fn deliver(&self, items: &[EnrichedItem]) -> Result<()> {
        if items.is_empty() {
            tracing::info!(target: "digest", "no new items");
        }
        for (i, it) in items.iter().enumerate() {
            tracing::info!(
                target: "digest",
                n = i + 1,
                title = %it.item.title,
                author = %it.item.author_name,
                link = it.item.link.as_deref().unwrap_or(""),
                translated = %it.translated,
                "digest item"
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

// --- Test helper ---
/// Keeps every delivered batch in memory.
#[derive(Default)]
pub struct MemoryDeliverer {
    pub calls: Mutex<Vec<Vec<EnrichedItem>>>,
}

impl MemoryDeliverer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<Vec<EnrichedItem>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl Deliverer for MemoryDeliverer {
    async fn deliver(&self, items: &[EnrichedItem]) -> Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(items.to_vec());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
