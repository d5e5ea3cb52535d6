// src/config/digest.rs
//! Run configuration. Resolved once by the binary and passed into each stage;
//! nothing below this module reads the environment.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::aggregate::SortKey;
use crate::enrich::TranslateField;
use crate::ingest::registry::default_sources;
use crate::ingest::types::SourceDescriptor;
use crate::select::{DedupField, Ranking};

pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/digest.toml";

const ENV_TRANSLATE_TO: &str = "TRANSLATE_TO";
const ENV_WINDOW_DAYS: &str = "DIGEST_WINDOW_DAYS";
const ENV_MAX_ITEMS: &str = "DIGEST_MAX_ITEMS";

pub const MYMEMORY_ENDPOINT: &str = "https://api.mymemory.translated.net/get";
const BROWSER_UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Recency window in days.
    pub window_days: u32,
    /// Upper bound on delivered items.
    pub max_items: usize,
    pub sort: SortKey,
    pub fetch: FetchSettings,
    pub select: SelectSettings,
    pub normalize: NormalizeSettings,
    pub translate: TranslateSettings,
    pub sources: Vec<SourceDescriptor>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            window_days: 3,
            max_items: 15,
            sort: SortKey::Recency,
            fetch: FetchSettings::default(),
            select: SelectSettings::default(),
            normalize: NormalizeSettings::default(),
            translate: TranslateSettings::default(),
            sources: default_sources(),
        }
    }
}

impl DigestConfig {
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.window_days))
    }

    /// Parse a TOML document; missing keys fall back to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: DigestConfig = toml::from_str(s).context("parsing digest config toml")?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Replace zero limits with defaults so later stages never divide by or truncate to 0.
    fn sanitize(&mut self) {
        let d = DigestConfig::default();
        if self.window_days == 0 {
            self.window_days = d.window_days;
        }
        if self.fetch.timeout_secs == 0 {
            self.fetch.timeout_secs = d.fetch.timeout_secs;
        }
        if self.translate.timeout_secs == 0 {
            self.translate.timeout_secs = d.translate.timeout_secs;
        }
        if self.select.prefix_chars == 0 {
            self.select.prefix_chars = d.select.prefix_chars;
        }
        if self.normalize.body_max_chars == 0 {
            self.normalize.body_max_chars = d.normalize.body_max_chars;
        }
        if self.normalize.summary_max_chars == 0 {
            self.normalize.summary_max_chars = d.normalize.summary_max_chars;
        }
        if self.translate.max_chars == 0 {
            self.translate.max_chars = d.translate.max_chars;
        }
        if self.translate.progress_every == 0 {
            self.translate.progress_every = d.translate.progress_every;
        }
        let lang = self.translate.target_lang.trim();
        self.translate.target_lang = if lang.is_empty() {
            d.translate.target_lang
        } else {
            lang.to_string()
        };
    }

    /// Apply `TRANSLATE_TO`, `DIGEST_WINDOW_DAYS` and `DIGEST_MAX_ITEMS` if set.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(lang) = std::env::var(ENV_TRANSLATE_TO) {
            self.translate.target_lang = lang;
        }
        if let Ok(v) = std::env::var(ENV_WINDOW_DAYS) {
            self.window_days = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_WINDOW_DAYS}={v:?} is not a number of days"))?;
        }
        if let Ok(v) = std::env::var(ENV_MAX_ITEMS) {
            self.max_items = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_ITEMS}={v:?} is not a count"))?;
        }
        self.sanitize();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_entries_per_feed: usize,
    pub search_query: String,
    pub search_hits_per_page: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: BROWSER_UA.to_string(),
            max_entries_per_feed: 10,
            search_query: "AI".to_string(),
            search_hits_per_page: 30,
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectSettings {
    pub dedup_field: DedupField,
    pub prefix_chars: usize,
    pub ranking: Ranking,
}

impl Default for SelectSettings {
    fn default() -> Self {
        Self {
            dedup_field: DedupField::Title,
            prefix_chars: 50,
            ranking: Ranking::Preserve,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeSettings {
    pub body_max_chars: usize,
    pub summary_max_chars: usize,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            body_max_chars: 500,
            summary_max_chars: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateSettings {
    pub endpoint: String,
    pub source_lang: String,
    pub target_lang: String,
    pub field: TranslateField,
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub max_chars: usize,
    pub progress_every: usize,
    /// Optional contact address; MyMemory grants a larger daily quota with it.
    pub contact_email: Option<String>,
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            endpoint: MYMEMORY_ENDPOINT.to_string(),
            source_lang: "en".to_string(),
            target_lang: "zh-CN".to_string(),
            field: TranslateField::Summary,
            delay_ms: 500,
            timeout_secs: 10,
            max_chars: 4000,
            progress_every: 5,
            contact_email: None,
        }
    }
}

impl TranslateSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Load config from an explicit TOML path.
pub fn load_from(path: &Path) -> Result<DigestConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading digest config from {}", path.display()))?;
    DigestConfig::from_toml_str(&content)
}

/// Resolve config the way the binary does:
/// 1) $DIGEST_CONFIG_PATH (must exist)
/// 2) config/digest.toml
/// 3) built-in defaults
///
/// Env overrides are applied last in every case.
pub fn load_default() -> Result<DigestConfig> {
    let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        load_from(&pb)?
    } else {
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            load_from(&default_p)?
        } else {
            DigestConfig::default()
        }
    };
    cfg.apply_env_overrides()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::SourceKind;

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = DigestConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, DigestConfig::default());
    }

    #[test]
    fn partial_sections_and_sources() {
        let cfg = DigestConfig::from_toml_str(
            r#"
window_days = 7
sort = "rank_score"

[select]
dedup_field = "content"
ranking = { dedup_then_sort = "recency" }

[translate]
target_lang = " ja "
delay_ms = 0

[[sources]]
name = "Only Feed"
endpoint = "https://example.test/rss"
kind = "feed"
"#,
        )
        .unwrap();
        assert_eq!(cfg.window_days, 7);
        assert_eq!(cfg.sort, SortKey::RankScore);
        assert_eq!(cfg.select.dedup_field, DedupField::Content);
        assert_eq!(cfg.select.prefix_chars, 50);
        assert_eq!(cfg.select.ranking, Ranking::DedupThenSort(SortKey::Recency));
        assert_eq!(cfg.translate.target_lang, "ja");
        assert_eq!(cfg.translate.delay(), Duration::ZERO);
        assert_eq!(cfg.sources.len(), 1);
        assert_eq!(cfg.sources[0].kind, SourceKind::Feed);
    }

    #[test]
    fn zero_limits_fall_back() {
        let cfg = DigestConfig::from_toml_str(
            "window_days = 0\n[normalize]\nsummary_max_chars = 0\n",
        )
        .unwrap();
        assert_eq!(cfg.window_days, 3);
        assert_eq!(cfg.normalize.summary_max_chars, 250);
    }

    #[test]
    fn zero_timeouts_fall_back() {
        let cfg = DigestConfig::from_toml_str(
            "[fetch]\ntimeout_secs = 0\n[translate]\ntimeout_secs = 0\n",
        )
        .unwrap();
        assert_eq!(cfg.fetch.timeout(), Duration::from_secs(15));
        assert_eq!(cfg.translate.timeout(), Duration::from_secs(10));
    }
}
