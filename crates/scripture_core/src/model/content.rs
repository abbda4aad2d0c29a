//! Normalized chapter content.

use crate::parser::{count_verse_markers, render_chapter};
use serde::{Deserialize, Serialize};

/// Chapter text rendered into the uniform verse-numbered markup.
///
/// Content with zero verse markers is the "not available" sentinel and must be
/// treated as absence by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterContent {
    /// Same value as the requested chapter id.
    pub id: String,
    pub bible_id: String,
    pub reference: String,
    pub content: String,
}

impl ChapterContent {
    /// Builds the sentinel value for a chapter without extractable verses.
    pub fn unavailable(chapter_id: &str, bible_id: &str, book_name: &str, number: &str) -> Self {
        Self {
            id: chapter_id.to_string(),
            bible_id: bible_id.to_string(),
            reference: reference_for(book_name, number),
            content: render_chapter(book_name, number, &[]),
        }
    }

    /// Number of verse paragraphs in `content`.
    pub fn verse_count(&self) -> usize {
        count_verse_markers(&self.content)
    }

    pub fn is_available(&self) -> bool {
        self.verse_count() > 0
    }
}

/// One verse extracted from a chapter payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedVerse {
    pub number: String,
    pub text: String,
}

impl ParsedVerse {
    pub fn new(number: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            text: text.into(),
        }
    }
}

pub(crate) fn reference_for(book_name: &str, number: &str) -> String {
    let book_name = book_name.trim();
    if book_name.is_empty() {
        number.to_string()
    } else {
        format!("{book_name} {number}")
    }
}
