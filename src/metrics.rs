// src/metrics.rs
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series carry descriptions once a recorder is installed).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_fetched_items_total",
            "Items returned by sources before filtering."
        );
        describe_counter!(
            "digest_source_errors_total",
            "Sources that failed, timed out or panicked."
        );
        describe_counter!(
            "digest_recency_dropped_total",
            "Items dropped by the recency window (including unparseable dates)."
        );
        describe_counter!(
            "digest_dedup_dropped_total",
            "Items dropped as near-duplicates."
        );
        describe_counter!(
            "digest_translations_total",
            "Translator calls made."
        );
        describe_counter!(
            "digest_translation_failures_total",
            "Items delivered with a translation placeholder."
        );
        describe_histogram!("digest_fetch_ms", "Per-source fetch time in milliseconds.");
        describe_gauge!("digest_last_run_ts", "Unix ts when the pipeline last ran.");
    });
}

/// Prometheus recorder for a single run; the binary logs `render()` at exit.
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }
}
