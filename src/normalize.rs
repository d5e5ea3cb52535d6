// src/normalize.rs
//! Text cleanup for item bodies and summaries.
//!
//! Order matters: markup spans are blanked first, whitespace is collapsed
//! second, and length is bounded last. Lengths count characters, not bytes.

use once_cell::sync::OnceCell;
use regex::Regex;

pub const ELLIPSIS: &str = "...";

/// Blunt textual strip of `<...>` spans. Not an HTML parser.
pub fn strip_markup(s: &str) -> String {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re = RE_TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("static tag regex"));
    re.replace_all(s, " ").into_owned()
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip markup, collapse whitespace, hard-truncate to `max_chars` plus `...`.
pub fn clean_content(s: &str, max_chars: usize) -> String {
    let out = collapse_whitespace(&strip_markup(s));
    match byte_offset(&out, max_chars) {
        Some(cut) => format!("{}{ELLIPSIS}", &out[..cut]),
        None => out,
    }
}

/// Like [`clean_content`], but prefers ending on a sentence.
///
/// The cut is placed after the last `.`, `?` or `!` inside the first
/// `max_chars` characters, provided that mark lies past half of `max_chars`.
/// Otherwise the text is hard-truncated with an ellipsis.
pub fn summarize(s: &str, max_chars: usize) -> String {
    let out = collapse_whitespace(&strip_markup(s));
    let Some(cut) = byte_offset(&out, max_chars) else {
        return out;
    };
    let window = &out[..cut];
    let sentence_end = window
        .char_indices()
        .enumerate()
        .filter(|(_, (_, c))| matches!(*c, '.' | '?' | '!'))
        .last();
    match sentence_end {
        Some((char_pos, (byte_pos, c))) if char_pos > max_chars / 2 => {
            window[..byte_pos + c.len_utf8()].to_string()
        }
        _ => format!("{window}{ELLIPSIS}"),
    }
}

/// Byte offset of the `max_chars`-th character, or `None` if `s` fits.
fn byte_offset(s: &str, max_chars: usize) -> Option<usize> {
    s.char_indices().nth(max_chars).map(|(i, _)| i)
}
