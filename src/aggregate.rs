// src/aggregate.rs
//! Fan-in stage: recency window + stable sort.

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::ingest::types::RawItem;

/// Sort key for the aggregated list. Both orders are descending and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recent first.
    #[default]
    Recency,
    /// Highest rank score first.
    RankScore,
}

impl SortKey {
    /// Stable in-place sort of items already known to carry a parsed timestamp.
    pub(crate) fn sort_dated(self, items: &mut [(DateTime<Utc>, RawItem)]) {
        match self {
            SortKey::Recency => items.sort_by(|a, b| b.0.cmp(&a.0)),
            SortKey::RankScore => items.sort_by(|a, b| b.1.rank_score.cmp(&a.1.rank_score)),
        }
    }

    /// Stable sort for lists where timestamps may be missing; undated items sink.
    pub fn sort(self, items: &mut [RawItem]) {
        match self {
            SortKey::Recency => items.sort_by_key(|i| std::cmp::Reverse(i.published())),
            SortKey::RankScore => items.sort_by_key(|i| std::cmp::Reverse(i.rank_score)),
        }
    }
}

/// Keep items published within `[now - window, ..]`, then sort by `key`.
///
/// Items whose timestamp is missing or unparseable are dropped. A window
/// reaching past the earliest representable instant has no lower bound.
pub fn aggregate(
    items: Vec<RawItem>,
    now: DateTime<Utc>,
    window: Duration,
    key: SortKey,
) -> Vec<RawItem> {
    let cutoff = now.checked_sub_signed(window);
    let total = items.len();

    let mut dated: Vec<(DateTime<Utc>, RawItem)> = items
        .into_iter()
        .filter_map(|item| item.published().map(|ts| (ts, item)))
        .filter(|(ts, _)| cutoff.map_or(true, |c| *ts >= c))
        .collect();

    let dropped = total - dated.len();
    counter!("digest_recency_dropped_total").increment(dropped as u64);
    tracing::info!(kept = dated.len(), dropped, "recency filter applied");

    key.sort_dated(&mut dated);
    dated.into_iter().map(|(_, item)| item).collect()
}
