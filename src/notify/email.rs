// src/notify/email.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};
use std::fmt::Write as _;

use super::Deliverer;
use crate::enrich::EnrichedItem;

/// HTML digest over SMTP (implicit TLS relay).
pub struct EmailDeliverer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} missing"))
}

impl EmailDeliverer {
    /// Reads `SMTP_HOST`, `SMTP_USER`, `SMTP_PASS`, `DIGEST_EMAIL_FROM`,
    /// `DIGEST_EMAIL_TO` and optional `SMTP_PORT`.
    pub fn from_env() -> Result<Self> {
        let host = required_env("SMTP_HOST")?;
        let user = required_env("SMTP_USER")?;
        let pass = required_env("SMTP_PASS")?;
        let from_addr = required_env("DIGEST_EMAIL_FROM")?;
        let to_addr = required_env("DIGEST_EMAIL_TO")?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
            .context("invalid SMTP_HOST")?
            .credentials(Credentials::new(user, pass));
        if let Ok(port) = std::env::var("SMTP_PORT") {
            builder = builder.port(port.trim().parse().context("invalid SMTP_PORT")?);
        }

        Ok(Self {
            mailer: builder.build(),
            from: from_addr.parse().context("invalid DIGEST_EMAIL_FROM")?,
            to: to_addr.parse().context("invalid DIGEST_EMAIL_TO")?,
        })
    }

    /// Check that the SMTP server accepts our credentials before doing any work.
    pub async fn verify(&self) -> Result<()> {
        let ok = self
            .mailer
            .test_connection()
            .await
            .context("smtp connection")?;
        anyhow::ensure!(ok, "smtp server rejected the connection test");
        Ok(())
    }
}

#[async_trait::async_trait]
impl Deliverer for EmailDeliverer {
    async fn deliver(&self, items: &[EnrichedItem]) -> Result<()> {
        let now = Utc::now();
        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject(items.len(), now))
            .header(header::ContentType::TEXT_HTML)
            .body(render_html(items, now))
            .context("build email")?;

        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "email"
    }
}

pub fn subject(count: usize, now: DateTime<Utc>) -> String {
    format!("AI digest - {} ({count} items)", now.format("%Y-%m-%d"))
}

/// Render the digest body. Every item shows its translation, or the summary
/// when the translation is empty.
pub fn render_html(items: &[EnrichedItem], now: DateTime<Utc>) -> String {
    let mut body = String::new();

    if items.is_empty() {
        body.push_str(r#"<p class="empty">No new items in this period.</p>"#);
    }

    for (i, it) in items.iter().enumerate() {
        let date = it
            .item
            .published()
            .map(|d| d.format("%m-%d").to_string())
            .unwrap_or_default();
        let text = if it.translated.is_empty() {
            &it.summary
        } else {
            &it.translated
        };
        let title = if it.item.title.is_empty() {
            "(untitled)"
        } else {
            it.item.title.as_str()
        };

        let _ = write!(
            body,
            r#"<div class="item"><div class="header"><span class="index">{n}</span> <span class="title">{title}</span> <span class="source">{author} | {date}</span></div><div class="content">{text}</div>"#,
            n = i + 1,
            title = encode_text(title),
            author = encode_text(&it.item.author_name),
            text = encode_text(text),
        );
        if let Some(link) = &it.item.link {
            let _ = write!(
                body,
                r#"<div class="link"><a href="{}" target="_blank">Original article</a></div>"#,
                encode_double_quoted_attribute(link)
            );
        }
        body.push_str("</div>");
    }

    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><style>{STYLE}</style></head><body><div class="container"><h1>AI digest</h1><p class="subtitle">{date} | {count} items</p>{body}<div class="footer">Sources: Hacker News and AI company blogs. Translation: MyMemory.</div></div></body></html>"#,
        date = now.format("%Y-%m-%d"),
        count = items.len(),
    )
}

const STYLE: &str = "body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Arial,sans-serif;max-width:700px;margin:0 auto;padding:20px;background:#f3f4f6}\
.container{background:#fff;border-radius:12px;padding:28px}\
h1{color:#1f2937;font-size:22px;margin-bottom:4px}\
.subtitle{color:#6b7280;font-size:13px;margin-bottom:24px}\
.item{margin-bottom:20px;padding-bottom:16px;border-bottom:1px solid #e5e7eb}\
.index{background:#3b82f6;color:#fff;padding:2px 8px;border-radius:4px;font-size:12px}\
.title{font-weight:600;color:#1f2937;font-size:16px}\
.source{color:#6b7280;font-size:12px;margin-left:8px}\
.content{color:#4b5563;line-height:1.8;font-size:14px;padding-left:32px}\
.link{margin-top:8px;padding-left:32px}\
.footer{margin-top:24px;padding-top:16px;border-top:1px solid #e5e7eb;color:#9ca3af;font-size:11px;text-align:center}";
