// src/enrich/translator.rs
//! Translation capability and the MyMemory HTTP implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::TranslateSettings;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status {0}")]
    Status(reqwest::StatusCode),
    /// The service answered but refused (quota, bad langpair, ...).
    #[error("rejected ({status}): {detail}")]
    Rejected { status: String, detail: String },
    #[error("decode: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslateError>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseStatus")]
    response_status: serde_json::Value,
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,
    #[serde(rename = "responseDetails", default)]
    response_details: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// MyMemory's `responseStatus` arrives as a number or a numeric string.
fn status_is_ok(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Number(n) => n.as_u64() == Some(200),
        serde_json::Value::String(s) => s.trim() == "200",
        _ => false,
    }
}

/// Free MyMemory API (`GET /get?q=..&langpair=en|zh-CN`).
pub struct MyMemoryTranslator {
    http: reqwest::Client,
    endpoint: String,
    contact_email: Option<String>,
}

impl MyMemoryTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("feed-digest/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4).min(timeout))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            contact_email: None,
        })
    }

    pub fn from_settings(s: &TranslateSettings) -> reqwest::Result<Self> {
        Ok(Self::new(&s.endpoint, s.timeout())?.with_contact_email(s.contact_email.clone()))
    }

    pub fn with_contact_email(mut self, email: Option<String>) -> Self {
        self.contact_email = email.filter(|e| !e.trim().is_empty());
        self
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslateError> {
        let langpair = format!("{from}|{to}");
        let mut req = self
            .http
            .get(&self.endpoint)
            .query(&[("q", text), ("langpair", langpair.as_str())]);
        if let Some(email) = &self.contact_email {
            req = req.query(&[("de", email.as_str())]);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status));
        }
        let body = resp.bytes().await?;
        let parsed: MyMemoryResponse =
            serde_json::from_slice(&body).map_err(|e| TranslateError::Decode(e.to_string()))?;

        if !status_is_ok(&parsed.response_status) {
            return Err(TranslateError::Rejected {
                status: parsed.response_status.to_string(),
                detail: parsed
                    .response_details
                    .as_str()
                    .unwrap_or_default()
                    .to_string(),
            });
        }
        parsed
            .response_data
            .and_then(|d| d.translated_text)
            .ok_or_else(|| TranslateError::Decode("missing responseData.translatedText".into()))
    }

    fn name(&self) -> &'static str {
        "mymemory"
    }
}
