//! Chapter payload normalization.
//!
//! # Responsibility
//! - Decode arbitrarily shaped chapter payloads into ordered verses.
//! - Render verses into the uniform heading + verse paragraph markup.
//!
//! # Invariants
//! - Keyed payloads are emitted in numeric key order, never lexical order.
//! - Empty, whitespace-only and literal `{}` texts never produce a verse.
//! - Content with zero verse markers always carries [`UNAVAILABLE_BLOCK`].
//! - Verse text and heading are HTML-escaped, so the only `<sup>` tags in
//!   rendered content are verse markers.
//!
//! # See also
//! - `usfm` and `step` for the non-JSON text formats.

pub mod step;
pub mod usfm;

use crate::model::content::ParsedVerse;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Object keys that may carry verse text, in preference order.
pub const TEXT_KEYS: [&str; 6] = ["content", "text", "verse", "t", "v", "value"];

const VERSE_MARKER: &str = "<sup>";

/// Appended after the heading when no verse could be extracted.
pub const UNAVAILABLE_BLOCK: &str = "<div class=\"scripture-unavailable\">\
<p>Scripture content not available in this format.</p>\
<p>Try versions like KJV, ESV, NIV, NASB, or NLT which should have content available.</p>\
</div>";

static REFERENCE_VERSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":(\d+)$").expect("valid reference verse regex"));
static BLANK_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid blank line regex"));

/// One entry of an array or keyed chapter payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerseValue {
    Text(String),
    Record {
        text: String,
        reference: Option<String>,
    },
    Unrecognized,
}

impl VerseValue {
    pub fn decode(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text.clone()),
            Value::Object(fields) => {
                let text = TEXT_KEYS.iter().find_map(|key| {
                    fields
                        .get(*key)
                        .and_then(Value::as_str)
                        .filter(|text| !text.is_empty())
                });
                match text {
                    Some(text) => Self::Record {
                        text: text.to_string(),
                        reference: fields
                            .get("reference")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    },
                    None => Self::Unrecognized,
                }
            }
            _ => Self::Unrecognized,
        }
    }

    fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Record { text, .. } => Some(text),
            Self::Unrecognized => None,
        }
    }

    fn reference_number(&self) -> Option<String> {
        match self {
            Self::Record {
                reference: Some(reference),
                ..
            } => verse_number_from_reference(reference),
            _ => None,
        }
    }
}

/// Chapter payload shapes, sniffed in order: array, object, string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterPayload {
    Verses(Vec<VerseValue>),
    /// Entries are already in numeric key order.
    Keyed(Vec<(String, VerseValue)>),
    Text(String),
    Unrecognized,
}

impl ChapterPayload {
    pub fn decode(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::Verses(items.iter().map(VerseValue::decode).collect()),
            Value::Object(fields) => {
                let mut entries: Vec<(String, VerseValue)> = fields
                    .iter()
                    .map(|(key, value)| (key.clone(), VerseValue::decode(value)))
                    .collect();
                entries.sort_by_key(|(key, _)| leading_integer(key));
                Self::Keyed(entries)
            }
            Value::String(text) => Self::Text(text.clone()),
            _ => Self::Unrecognized,
        }
    }

    /// Resolves the payload into ordered verses.
    pub fn into_verses(self) -> Vec<ParsedVerse> {
        match self {
            Self::Verses(items) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    let text = clean_verse_text(item.text()?)?;
                    let number = item
                        .reference_number()
                        .unwrap_or_else(|| (index + 1).to_string());
                    Some(ParsedVerse::new(number, text))
                })
                .collect(),
            Self::Keyed(entries) => entries
                .iter()
                .filter_map(|(key, item)| {
                    let text = clean_verse_text(item.text()?)?;
                    let number = item.reference_number().unwrap_or_else(|| key.clone());
                    Some(ParsedVerse::new(number, text))
                })
                .collect(),
            Self::Text(text) => BLANK_LINE_RE
                .split(&text)
                .filter_map(clean_verse_text)
                .enumerate()
                .map(|(index, text)| ParsedVerse::new((index + 1).to_string(), text))
                .collect(),
            Self::Unrecognized => {
                debug!("event=payload_decode module=parser status=unrecognized");
                Vec::new()
            }
        }
    }
}

/// Extracts ordered verses from a raw chapter payload.
pub fn extract_verses(value: &Value) -> Vec<ParsedVerse> {
    ChapterPayload::decode(value).into_verses()
}

/// Parses a raw chapter payload straight into rendered content.
pub fn parse_chapter_content(value: &Value, book_name: &str, chapter: &str) -> String {
    render_chapter(book_name, chapter, &extract_verses(value))
}

/// Renders verses into the normalized content markup.
pub fn render_chapter(book_name: &str, chapter: &str, verses: &[ParsedVerse]) -> String {
    let heading = crate::model::content::reference_for(book_name, chapter);
    let mut content = format!("<h3>{}</h3>", escape_html(&heading));
    for verse in verses {
        content.push_str(&format!(
            "<p><sup>{}</sup> {}</p>",
            escape_html(&verse.number),
            escape_html(&verse.text)
        ));
    }
    if verses.is_empty() {
        content.push_str(UNAVAILABLE_BLOCK);
    }
    content
}

/// Number of verse paragraphs in rendered content.
pub fn count_verse_markers(content: &str) -> usize {
    content.matches(VERSE_MARKER).count()
}

/// Whether rendered content is the "not available" sentinel.
pub fn is_unavailable(content: &str) -> bool {
    count_verse_markers(content) == 0
}

/// Verse number from the trailing `:N` of a reference such as `Job 1:3`.
pub fn verse_number_from_reference(reference: &str) -> Option<String> {
    REFERENCE_VERSE_RE
        .captures(reference.trim())
        .and_then(|captures| captures.get(1))
        .map(|number| number.as_str().to_string())
}

/// Collapses whitespace runs; `None` for text that must not become a verse.
pub fn clean_verse_text(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed == "{}" {
        None
    } else {
        Some(collapsed)
    }
}

/// Integer value of a key's leading digits (`"10a"` -> 10); anything else is 0.
///
/// Digit runs beyond the `i64` range saturate.
pub fn leading_integer(key: &str) -> i64 {
    let trimmed = key.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return 0;
    }
    match digits.parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
