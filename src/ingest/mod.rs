// src/ingest/mod.rs
pub mod parse;
pub mod providers;
pub mod registry;
pub mod types;

use futures::future::join_all;
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ingest::types::{RawItem, SourceError, SourceProvider};

/// Failure reasons are cut to this many characters in log lines.
const REASON_LOG_CHARS: usize = 60;

fn truncate_reason(reason: &str) -> String {
    reason.chars().take(REASON_LOG_CHARS).collect()
}

/// Fetch one source with its own deadline. Never fails: any error, timeout or
/// empty payload becomes an empty list plus a log line.
pub async fn fetch_source(provider: Arc<dyn SourceProvider>, timeout: Duration) -> Vec<RawItem> {
    let name = provider.name().to_string();
    tracing::debug!(source = %name, "fetching");
    let t0 = Instant::now();

    let res = match tokio::time::timeout(timeout, provider.fetch_latest()).await {
        Ok(r) => r,
        Err(_) => Err(SourceError::Timeout(timeout)),
    };
    histogram!("digest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    match res {
        Ok(items) => {
            tracing::info!(source = %name, items = items.len(), "source fetched");
            counter!("digest_fetched_items_total").increment(items.len() as u64);
            items
        }
        Err(e) => {
            record_source_failure(&name, &e);
            Vec::new()
        }
    }
}

fn record_source_failure(name: &str, e: &SourceError) {
    tracing::warn!(source = %name, error = %truncate_reason(&e.to_string()), "source failed");
    counter!("digest_source_errors_total").increment(1);
}

/// Fan out one task per provider and wait until every task has settled.
///
/// Output keeps provider order, then each provider's own item order. A panicking
/// or hanging provider only loses its own items.
pub async fn fetch_all(providers: &[Arc<dyn SourceProvider>], timeout: Duration) -> Vec<RawItem> {
    crate::metrics::ensure_metrics_described();
    tracing::info!(sources = providers.len(), "fetching sources");

    let tasks: Vec<_> = providers
        .iter()
        .map(|p| {
            let name = p.name().to_string();
            let handle = tokio::spawn(fetch_source(Arc::clone(p), timeout));
            (name, handle)
        })
        .collect();

    let settled = join_all(
        tasks
            .into_iter()
            .map(|(name, handle)| async move { (name, handle.await) }),
    )
    .await;

    let mut all = Vec::new();
    for (name, outcome) in settled {
        match outcome {
            Ok(mut items) => all.append(&mut items),
            Err(join_err) => record_source_failure(&name, &SourceError::Join(join_err.to_string())),
        }
    }
    tracing::info!(items = all.len(), "total raw items");
    all
}
