// src/ingest/parse.rs
//! Feed document parsing (RSS 2.0, RSS 1.0/RDF, Atom) over quick-xml serde.

use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use crate::ingest::types::SourceError;

/// One entry of a parsed feed document. All fields as found, entity-decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub content: Option<String>,
    pub link: Option<String>,
    pub id: Option<String>,
    pub published: Option<String>,
}

/// Parsing collaborator: raw bytes in, entries out (or a failure).
pub trait FeedParser: Send + Sync {
    fn parse(&self, raw: &[u8]) -> Result<Vec<FeedEntry>, SourceError>;
}

/// Default parser. Sniffs the root element and dispatches to RSS or Atom.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlFeedParser;

impl FeedParser for XmlFeedParser {
    fn parse(&self, raw: &[u8]) -> Result<Vec<FeedEntry>, SourceError> {
        let text = String::from_utf8_lossy(raw);
        let xml = scrub_html_entities_for_xml(text.trim_start_matches('\u{feff}'));
        match root_name(&xml)?.as_str() {
            "rss" | "RDF" => parse_rss(&xml),
            "feed" => parse_atom(&xml),
            other => Err(SourceError::Parse(format!("unsupported root element <{other}>"))),
        }
    }
}

fn root_name(xml: &str) -> Result<String, SourceError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => return Err(SourceError::Parse("empty document".into())),
            Ok(_) => continue,
            Err(e) => return Err(SourceError::Parse(e.to_string())),
        }
    }
}

// --- RSS 2.0 / RDF ---

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Option<Channel>,
    // RSS 1.0 keeps items next to the channel, not inside it.
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<Text>,
    link: Option<Text>,
    guid: Option<Text>,
    #[serde(rename = "pubDate")]
    pub_date: Option<Text>,
    #[serde(rename = "dc:date")]
    dc_date: Option<Text>,
    description: Option<Text>,
    #[serde(rename = "content:encoded")]
    encoded: Option<Text>,
}

fn parse_rss(xml: &str) -> Result<Vec<FeedEntry>, SourceError> {
    let rss: Rss = from_str(xml).map_err(|e| SourceError::Parse(format!("rss: {e}")))?;
    let items = rss
        .channel
        .map(|c| c.item)
        .unwrap_or_default()
        .into_iter()
        .chain(rss.item);
    Ok(items
        .map(|it| FeedEntry {
            title: text_of(it.title),
            content: text_of(it.encoded).or_else(|| text_of(it.description)),
            link: text_of(it.link),
            id: text_of(it.guid),
            published: text_of(it.pub_date).or_else(|| text_of(it.dc_date)),
        })
        .collect())
}

// --- Atom ---

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<Text>,
    #[serde(rename = "link", default)]
    link: Vec<AtomLink>,
    id: Option<Text>,
    published: Option<Text>,
    updated: Option<Text>,
    summary: Option<Text>,
    content: Option<Text>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

fn parse_atom(xml: &str) -> Result<Vec<FeedEntry>, SourceError> {
    let feed: AtomFeed = from_str(xml).map_err(|e| SourceError::Parse(format!("atom: {e}")))?;
    Ok(feed
        .entry
        .into_iter()
        .map(|en| {
            // rel defaults to "alternate" when missing
            let link = en
                .link
                .iter()
                .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
                .or_else(|| en.link.first())
                .and_then(|l| l.href.clone())
                .filter(|h| !h.trim().is_empty());
            FeedEntry {
                title: text_of(en.title),
                content: text_of(en.summary).or_else(|| text_of(en.content)),
                link,
                id: text_of(en.id),
                published: text_of(en.published).or_else(|| text_of(en.updated)),
            }
        })
        .collect())
}

/// Element text, ignoring attributes such as `type="html"` or `isPermaLink`.
#[derive(Debug, Default, Deserialize)]
struct Text {
    #[serde(rename = "$text", default)]
    value: String,
}

fn text_of(t: Option<Text>) -> Option<String> {
    let decoded = html_escape::decode_html_entities(t?.value.trim()).into_owned();
    (!decoded.is_empty()).then_some(decoded)
}

/// HTML-only entities are not valid XML; replace the common ones before parsing.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&hellip;", "...")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
