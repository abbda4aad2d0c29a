//! Book, chapter and verse records.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One book of a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Canonical code (`GEN`) or an upper-cased discovered source key.
    pub id: String,
    pub bible_id: String,
    pub abbreviation: String,
    pub name: String,
    pub name_long: String,
}

/// One chapter of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// `{bible_id}.{book_id}.{number}`.
    pub id: String,
    pub bible_id: String,
    pub book_id: String,
    /// 1-based, no leading zeros for generated chapters.
    pub number: String,
    pub reference: String,
}

impl Chapter {
    pub fn new(bible_id: &str, book_id: &str, number: &str, book_name: &str) -> Self {
        Self {
            id: ChapterId::compose(bible_id, book_id, number),
            bible_id: bible_id.to_string(),
            book_id: book_id.to_string(),
            number: number.to_string(),
            reference: format!("{book_name} {number}"),
        }
    }
}

/// Verse-level record.
///
/// Only materialized from parsed chapter data; callers should prefer chapter
/// content when they need the full text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub id: String,
    pub org_id: String,
    pub bible_id: String,
    pub book_id: String,
    pub chapter_id: String,
    pub reference: String,
    pub text: String,
}

/// Parsed form of a `bible.BOOK.N` chapter id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChapterId {
    pub bible_id: String,
    pub book_id: String,
    pub number: String,
}

impl ChapterId {
    /// Composes the canonical chapter id string.
    pub fn compose(bible_id: &str, book_id: &str, number: &str) -> String {
        format!("{bible_id}.{book_id}.{number}")
    }

    /// Parses a chapter id.
    ///
    /// Splits from the right so translation ids containing dots survive.
    /// Returns `None` when fewer than three non-empty parts are present.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().rsplitn(3, '.');
        let number = parts.next()?.trim();
        let book_id = parts.next()?.trim();
        let bible_id = parts.next()?.trim();
        if number.is_empty() || book_id.is_empty() || bible_id.is_empty() {
            return None;
        }
        Some(Self {
            bible_id: bible_id.to_string(),
            book_id: book_id.to_string(),
            number: number.to_string(),
        })
    }
}

impl Display for ChapterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.bible_id, self.book_id, self.number)
    }
}
