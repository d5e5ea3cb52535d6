// src/config/mod.rs
pub mod digest;

pub use digest::{
    load_default, load_from, DigestConfig, FetchSettings, NormalizeSettings, SelectSettings,
    TranslateSettings, DEFAULT_CONFIG_PATH, ENV_CONFIG_PATH,
};
