// src/select.rs
//! Near-duplicate collapse and output bound.
//!
//! The dedup key is a deliberately coarse heuristic: the first `prefix_chars`
//! characters of the markup-stripped, lowercased, whitespace-collapsed title
//! (or content). Items sharing a key are duplicates; the first one seen wins.

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::aggregate::SortKey;
use crate::ingest::types::RawItem;
use crate::normalize::{collapse_whitespace, strip_markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupField {
    #[default]
    Title,
    Content,
}

/// Where ranking happens relative to dedup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    /// Keep the incoming order (already sorted by the aggregator).
    #[default]
    Preserve,
    /// Stable sort by key, then dedup.
    SortThenDedup(SortKey),
    /// Dedup in incoming order, then stable sort by key.
    DedupThenSort(SortKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupPolicy {
    pub field: DedupField,
    pub prefix_chars: usize,
}

impl Default for DedupPolicy {
    fn default() -> Self {
        Self {
            field: DedupField::Title,
            prefix_chars: 50,
        }
    }
}

impl DedupPolicy {
    /// Normalized prefix used as identity. Falls back to the other field when
    /// the chosen one is empty.
    pub fn key(&self, item: &RawItem) -> String {
        let (primary, fallback) = match self.field {
            DedupField::Title => (&item.title, &item.content),
            DedupField::Content => (&item.content, &item.title),
        };
        let norm = |s: &str| collapse_whitespace(&strip_markup(s)).to_lowercase();
        let mut key = norm(primary);
        if key.is_empty() {
            key = norm(fallback);
        }
        key.chars().take(self.prefix_chars).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    pub count: usize,
    pub dedup: DedupPolicy,
    pub ranking: Ranking,
}

impl Selector {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            dedup: DedupPolicy::default(),
            ranking: Ranking::Preserve,
        }
    }

    pub fn with_dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_ranking(mut self, ranking: Ranking) -> Self {
        self.ranking = ranking;
        self
    }

    /// At most `count` items, no two sharing a dedup key.
    pub fn select(&self, mut items: Vec<RawItem>) -> Vec<RawItem> {
        let before = items.len();
        let mut out = match self.ranking {
            Ranking::Preserve => self.dedup_in_order(items),
            Ranking::SortThenDedup(key) => {
                key.sort(&mut items);
                self.dedup_in_order(items)
            }
            Ranking::DedupThenSort(key) => {
                let mut unique = self.dedup_in_order(items);
                key.sort(&mut unique);
                unique
            }
        };
        let dropped = before - out.len();
        counter!("digest_dedup_dropped_total").increment(dropped as u64);
        out.truncate(self.count);
        tracing::info!(unique = before - dropped, selected = out.len(), "selected items");
        out
    }

    fn dedup_in_order(&self, items: Vec<RawItem>) -> Vec<RawItem> {
        let mut seen: HashSet<String> = HashSet::new();
        items
            .into_iter()
            .filter(|it| seen.insert(self.dedup.key(it)))
            .collect()
    }
}
