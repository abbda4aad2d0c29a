//! USFM chapter extraction for unfoldingWord books.

use crate::model::content::ParsedVerse;
use crate::parser::clean_verse_text;
use once_cell::sync::Lazy;
use regex::Regex;

static CHAPTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\\c\s+(\d+)").expect("valid usfm chapter regex"));
static VERSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\\v\s+(\d+[a-z]?(?:-\d+)?)\s*(.*)$").expect("valid usfm verse regex"));
static NOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(f|fe|x)\s.*?\\(f|fe|x)\*").expect("valid usfm note regex"));
static ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|[^\\]*").expect("valid usfm attribute regex"));
static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\+?[a-z]+\d*\*?").expect("valid usfm marker regex"));

/// Extracts the verses of one chapter from a USFM book.
///
/// The chapter runs from its `\c N` line to the next `\c` line. Text lines
/// after a `\v` marker continue the current verse.
pub fn extract_usfm_chapter(usfm: &str, chapter: &str) -> Vec<ParsedVerse> {
    let wanted = chapter.trim().trim_start_matches('0');
    let mut in_chapter = false;
    let mut verses = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in usfm.lines() {
        let line = line.trim();
        if let Some(captures) = CHAPTER_RE.captures(line) {
            if in_chapter {
                break;
            }
            in_chapter = captures[1].trim_start_matches('0') == wanted;
            continue;
        }
        if !in_chapter {
            continue;
        }
        if let Some(captures) = VERSE_RE.captures(line) {
            flush(&mut verses, current.take());
            current = Some((captures[1].to_string(), strip_markup(&captures[2])));
        } else if let Some((_, text)) = current.as_mut() {
            let continuation = strip_markup(line);
            if !continuation.is_empty() {
                text.push(' ');
                text.push_str(&continuation);
            }
        }
    }
    flush(&mut verses, current);
    verses
}

fn flush(verses: &mut Vec<ParsedVerse>, verse: Option<(String, String)>) {
    if let Some((number, text)) = verse {
        if let Some(text) = clean_verse_text(&text) {
            verses.push(ParsedVerse::new(number, text));
        }
    }
}

/// Removes notes, word attributes and inline markers from one USFM fragment.
pub fn strip_markup(fragment: &str) -> String {
    let without_notes = NOTE_RE.replace_all(fragment, " ");
    let without_attributes = ATTRIBUTE_RE.replace_all(&without_notes, "");
    let without_markers = MARKER_RE.replace_all(&without_attributes, " ");
    without_markers.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::{extract_usfm_chapter, strip_markup};

    const BOOK: &str = "\\id GEN\n\\h Genesis\n\\c 1\n\\p\n\\v 1 In the beginning\n\\q God created\n\\v 2 And the earth\n\\c 10\n\\v 1 Now these are the generations\n\\c 2\n\\v 1 Thus the heavens\n";

    #[test]
    fn extracts_only_the_requested_chapter() {
        let verses = extract_usfm_chapter(BOOK, "1");
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].number, "1");
        assert_eq!(verses[0].text, "In the beginning God created");
        assert_eq!(verses[1].text, "And the earth");
    }

    #[test]
    fn chapter_match_is_exact() {
        let verses = extract_usfm_chapter(BOOK, "10");
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].text, "Now these are the generations");
        assert!(extract_usfm_chapter(BOOK, "3").is_empty());
    }

    #[test]
    fn strips_word_attributes_and_notes() {
        let line = "\\w In|strong=\"H7225\"\\w* \\w the\\w* beginning\\f + \\fr 1:1 \\ft note\\f*.";
        assert_eq!(strip_markup(line), "In the beginning .");
    }
}
