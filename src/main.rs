//! feed-digest — binary entrypoint.
//! Loads `.env` and config, runs the pipeline once, delivers the digest.
//!
//! Delivery: `DIGEST_DELIVERY=email` (default) or `log` for a dry run.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feed_digest::metrics::Metrics;
use feed_digest::notify::{Deliverer, EmailDeliverer, LogDeliverer};
use feed_digest::{build_pipeline, config};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feed_digest=info,warn"));
    let json = std::env::var("DIGEST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

async fn deliverer_from_env() -> Result<Box<dyn Deliverer>> {
    let mode = std::env::var("DIGEST_DELIVERY").unwrap_or_else(|_| "email".to_string());
    match mode.trim().to_ascii_lowercase().as_str() {
        "log" => Ok(Box::new(LogDeliverer)),
        "email" => {
            let email = EmailDeliverer::from_env()?;
            email.verify().await?;
            tracing::info!("smtp connection verified");
            Ok(Box::new(email))
        }
        other => anyhow::bail!("unsupported DIGEST_DELIVERY={other:?} (expected email|log)"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let metrics = if std::env::var("DIGEST_METRICS").is_ok_and(|v| v == "1") {
        Some(Metrics::init()?)
    } else {
        None
    };

    let cfg = config::load_default().context("loading digest config")?;
    tracing::info!(
        sources = cfg.sources.len(),
        window_days = cfg.window_days,
        max_items = cfg.max_items,
        to = %cfg.translate.target_lang,
        "digest starting"
    );

    // Credentials are checked before any source is fetched.
    let deliverer = deliverer_from_env().await?;
    let pipeline = build_pipeline(cfg)?;
    let items = pipeline
        .run_and_deliver(chrono::Utc::now(), deliverer.as_ref())
        .await?;

    tracing::info!(items = items.len(), "digest finished");
    if let Some(m) = metrics {
        tracing::info!(target: "metrics", "\n{}", m.render());
    }
    Ok(())
}
