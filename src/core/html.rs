//! Pulls coordinate rows out of published HTML documents.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr\s*>").expect("valid row regex"));
static CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<t([dh])\b[^>]*>(.*?)</t[dh]\s*>").expect("valid cell regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static SKIPPED_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|head)\b[^>]*>.*?</(script|style|head)\s*>")
        .expect("valid block regex")
});
static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|tr|h[1-6])\s*>").expect("valid line break regex")
});
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity regex")
});
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(decimal) = entity.strip_prefix('#') {
                decimal.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn cell_text(inner: &str) -> String {
    let stripped = TAG_RE.replace_all(inner, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}

/// One row per `<tr>`, one field per `<td>`/`<th>`. Rows without cells are dropped.
pub fn table_rows(html: &str) -> Vec<Vec<String>> {
    ROW_RE
        .captures_iter(html)
        .map(|row| {
            CELL_RE
                .captures_iter(&row[1])
                .map(|cell| cell_text(&cell[2]))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

/// Plain-text rendering for documents that carry their rows as paragraphs.
pub fn to_text(html: &str) -> String {
    let without_blocks = SKIPPED_BLOCK_RE.replace_all(html, "");
    let with_breaks = LINE_BREAK_RE.replace_all(&without_blocks, "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    decode_entities(&stripped)
}
