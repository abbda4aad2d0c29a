//! Canonical 66-book structure and book-key aliases.
//!
//! # Invariants
//! - `STANDARD_BOOKS` is ordered Old Testament then New Testament.
//! - Every alias maps to exactly one canonical book.
//! - The first alias of each book is its full lowercase name, the second its
//!   three-letter abbreviation.

use crate::model::book::{Book, Chapter};
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Testament {
    Old,
    New,
}

/// One canonical book with its fallback chapter count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardBook {
    pub id: &'static str,
    pub name: &'static str,
    pub chapters: u32,
    pub testament: Testament,
    /// Source-key spellings in lookup preference order.
    pub aliases: &'static [&'static str],
}

const fn ot(
    id: &'static str,
    name: &'static str,
    chapters: u32,
    aliases: &'static [&'static str],
) -> StandardBook {
    StandardBook {
        id,
        name,
        chapters,
        testament: Testament::Old,
        aliases,
    }
}

const fn nt(
    id: &'static str,
    name: &'static str,
    chapters: u32,
    aliases: &'static [&'static str],
) -> StandardBook {
    StandardBook {
        id,
        name,
        chapters,
        testament: Testament::New,
        aliases,
    }
}

pub const STANDARD_BOOKS: &[StandardBook] = &[
    ot("GEN", "Genesis", 50, &["genesis", "gen", "ge", "gn"]),
    ot("EXO", "Exodus", 40, &["exodus", "exo", "ex", "exod"]),
    ot("LEV", "Leviticus", 27, &["leviticus", "lev", "le", "lv"]),
    ot("NUM", "Numbers", 36, &["numbers", "num", "nu", "nm"]),
    ot("DEU", "Deuteronomy", 34, &["deuteronomy", "deu", "dt", "deut"]),
    ot("JOS", "Joshua", 24, &["joshua", "jos", "josh"]),
    ot("JDG", "Judges", 21, &["judges", "jdg", "judg"]),
    ot("RUT", "Ruth", 4, &["ruth", "rut", "ru"]),
    ot("1SA", "1 Samuel", 31, &["1samuel", "1sa", "1sam"]),
    ot("2SA", "2 Samuel", 24, &["2samuel", "2sa", "2sam"]),
    ot("1KI", "1 Kings", 22, &["1kings", "1ki", "1kgs"]),
    ot("2KI", "2 Kings", 25, &["2kings", "2ki", "2kgs"]),
    ot("1CH", "1 Chronicles", 29, &["1chronicles", "1ch", "1chr"]),
    ot("2CH", "2 Chronicles", 36, &["2chronicles", "2ch", "2chr"]),
    ot("EZR", "Ezra", 10, &["ezra", "ezr"]),
    ot("NEH", "Nehemiah", 13, &["nehemiah", "neh", "ne"]),
    ot("EST", "Esther", 10, &["esther", "est", "esth"]),
    ot("JOB", "Job", 42, &["job", "jb"]),
    ot("PSA", "Psalms", 150, &["psalms", "psa", "psalm", "ps"]),
    ot("PRO", "Proverbs", 31, &["proverbs", "pro", "prov", "prv"]),
    ot("ECC", "Ecclesiastes", 12, &["ecclesiastes", "ecc", "eccl", "qoh"]),
    ot(
        "SNG",
        "Song of Solomon",
        8,
        &["songofsolomon", "sng", "song", "songofsongs", "sos"],
    ),
    ot("ISA", "Isaiah", 66, &["isaiah", "isa", "is"]),
    ot("JER", "Jeremiah", 52, &["jeremiah", "jer", "je"]),
    ot("LAM", "Lamentations", 5, &["lamentations", "lam", "la"]),
    ot("EZK", "Ezekiel", 48, &["ezekiel", "eze", "ezk", "ezek"]),
    ot("DAN", "Daniel", 12, &["daniel", "dan", "da", "dn"]),
    ot("HOS", "Hosea", 14, &["hosea", "hos", "ho"]),
    ot("JOL", "Joel", 3, &["joel", "joe", "jol", "jl"]),
    ot("AMO", "Amos", 9, &["amos", "amo", "am"]),
    ot("OBA", "Obadiah", 1, &["obadiah", "oba", "obad", "ob"]),
    ot("JON", "Jonah", 4, &["jonah", "jon", "jnh"]),
    ot("MIC", "Micah", 7, &["micah", "mic", "mi"]),
    ot("NAM", "Nahum", 3, &["nahum", "nah", "nam", "na"]),
    ot("HAB", "Habakkuk", 3, &["habakkuk", "hab", "hb"]),
    ot("ZEP", "Zephaniah", 3, &["zephaniah", "zep", "zeph"]),
    ot("HAG", "Haggai", 2, &["haggai", "hag", "hg"]),
    ot("ZEC", "Zechariah", 14, &["zechariah", "zec", "zech"]),
    ot("MAL", "Malachi", 4, &["malachi", "mal", "ml"]),
    nt("MAT", "Matthew", 28, &["matthew", "mat", "matt", "mt"]),
    nt("MRK", "Mark", 16, &["mark", "mar", "mrk", "mk"]),
    nt("LUK", "Luke", 24, &["luke", "luk", "lk"]),
    nt("JHN", "John", 21, &["john", "joh", "jhn", "jn"]),
    nt("ACT", "Acts", 28, &["acts", "act", "ac"]),
    nt("ROM", "Romans", 16, &["romans", "rom", "ro", "rm"]),
    nt("1CO", "1 Corinthians", 16, &["1corinthians", "1co", "1cor"]),
    nt("2CO", "2 Corinthians", 13, &["2corinthians", "2co", "2cor"]),
    nt("GAL", "Galatians", 6, &["galatians", "gal", "ga"]),
    nt("EPH", "Ephesians", 6, &["ephesians", "eph", "ephes"]),
    nt("PHP", "Philippians", 4, &["philippians", "phi", "php", "phil"]),
    nt("COL", "Colossians", 4, &["colossians", "col"]),
    nt("1TH", "1 Thessalonians", 5, &["1thessalonians", "1th", "1thess"]),
    nt("2TH", "2 Thessalonians", 3, &["2thessalonians", "2th", "2thess"]),
    nt("1TI", "1 Timothy", 6, &["1timothy", "1ti", "1tim"]),
    nt("2TI", "2 Timothy", 4, &["2timothy", "2ti", "2tim"]),
    nt("TIT", "Titus", 3, &["titus", "tit"]),
    nt("PHM", "Philemon", 1, &["philemon", "phm", "philem"]),
    nt("HEB", "Hebrews", 13, &["hebrews", "heb"]),
    nt("JAS", "James", 5, &["james", "jam", "jas", "jm"]),
    nt("1PE", "1 Peter", 5, &["1peter", "1pe", "1pet"]),
    nt("2PE", "2 Peter", 3, &["2peter", "2pe", "2pet"]),
    nt("1JN", "1 John", 5, &["1john", "1jo", "1jn"]),
    nt("2JN", "2 John", 1, &["2john", "2jo", "2jn"]),
    nt("3JN", "3 John", 1, &["3john", "3jo", "3jn"]),
    nt("JUD", "Jude", 1, &["jude", "jud", "jd"]),
    nt("REV", "Revelation", 22, &["revelation", "rev", "re", "rv"]),
];

static BOOKS_BY_ALIAS: Lazy<HashMap<&'static str, &'static StandardBook>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for book in STANDARD_BOOKS {
        index.insert(book.id, book);
    }
    for book in STANDARD_BOOKS {
        for alias in book.aliases {
            index.entry(*alias).or_insert(book);
        }
    }
    index
});

/// Lowercases a raw source key and drops separators (`1 Samuel` -> `1samuel`).
pub fn normalize_book_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '_' | '.' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Finds the canonical book for a canonical id or any known alias.
pub fn find_standard_book(raw: &str) -> Option<&'static StandardBook> {
    let trimmed = raw.trim();
    if let Some(book) = BOOKS_BY_ALIAS.get(trimmed.to_ascii_uppercase().as_str()) {
        return Some(book);
    }
    BOOKS_BY_ALIAS.get(normalize_book_key(trimmed).as_str()).copied()
}

/// Maps a raw source key to its canonical id.
pub fn canonical_book_id(raw: &str) -> Option<&'static str> {
    find_standard_book(raw).map(|book| book.id)
}

/// Human-readable name for a raw book key.
///
/// Unknown keys are returned with their first letter capitalized.
pub fn book_name_for_key(raw: &str) -> String {
    if let Some(book) = find_standard_book(raw) {
        return book.name.to_string();
    }
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered source-key spellings to try for one requested book id.
///
/// Canonical aliases come first, then the requested id lowercased. No
/// duplicates.
pub fn book_key_candidates(book_id: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    if let Some(book) = find_standard_book(book_id) {
        for alias in book.aliases {
            push_unique(&mut candidates, (*alias).to_string());
        }
    }
    let requested = book_id.trim().to_lowercase();
    if !requested.is_empty() {
        push_unique(&mut candidates, requested);
    }
    candidates
}

/// Standard catalog annotated with `bible_id`.
pub fn standard_books(bible_id: &str) -> Vec<Book> {
    STANDARD_BOOKS
        .iter()
        .map(|book| Book {
            id: book.id.to_string(),
            bible_id: bible_id.to_string(),
            abbreviation: book.id.to_string(),
            name: book.name.to_string(),
            name_long: book.name.to_string(),
        })
        .collect()
}

/// Canonical chapter count; unknown books have one chapter.
pub fn standard_chapter_count(book_id: &str) -> u32 {
    find_standard_book(book_id).map_or(1, |book| book.chapters)
}

/// Chapters `1..=count` for a book, using canonical counts.
pub fn standard_chapters(bible_id: &str, book_id: &str) -> Vec<Chapter> {
    let book_name = book_name_for_key(book_id);
    (1..=standard_chapter_count(book_id))
        .map(|number| Chapter::new(bible_id, book_id, &number.to_string(), &book_name))
        .collect()
}

fn push_unique(items: &mut Vec<String>, value: String) {
    if !items.contains(&value) {
        items.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_catalog_has_66_books_in_canonical_order() {
        assert_eq!(STANDARD_BOOKS.len(), 66);
        assert_eq!(STANDARD_BOOKS[0].id, "GEN");
        assert_eq!(STANDARD_BOOKS[38].id, "MAL");
        assert_eq!(STANDARD_BOOKS[39].id, "MAT");
        assert_eq!(STANDARD_BOOKS[65].id, "REV");
        let old = STANDARD_BOOKS
            .iter()
            .filter(|book| book.testament == Testament::Old)
            .count();
        assert_eq!(old, 39);
    }

    #[test]
    fn aliases_are_unique_across_books() {
        let mut seen = HashSet::new();
        for book in STANDARD_BOOKS {
            for alias in book.aliases {
                assert!(seen.insert(*alias), "alias `{alias}` is used twice");
            }
        }
    }

    #[test]
    fn alternate_spellings_map_to_one_name() {
        assert_eq!(book_name_for_key("gen"), "Genesis");
        assert_eq!(book_name_for_key("ge"), "Genesis");
        assert_eq!(book_name_for_key("GENESIS"), "Genesis");
        assert_eq!(book_name_for_key("1 Samuel"), "1 Samuel");
        assert_eq!(book_name_for_key("song_of_solomon"), "Song of Solomon");
        assert_eq!(book_name_for_key("enoch"), "Enoch");
    }

    #[test]
    fn candidates_start_with_full_name_then_abbreviations() {
        assert_eq!(
            book_key_candidates("GEN"),
            vec!["genesis", "gen", "ge", "gn"]
        );
        assert_eq!(book_key_candidates("JUDITH"), vec!["judith"]);
    }

    #[test]
    fn canonical_ids_resolve_from_aliases() {
        assert_eq!(canonical_book_id("psalm"), Some("PSA"));
        assert_eq!(canonical_book_id("jhn"), Some("JHN"));
        assert_eq!(canonical_book_id("philippians"), Some("PHP"));
        assert_eq!(canonical_book_id("unknown"), None);
    }

    #[test]
    fn standard_chapters_use_canonical_counts() {
        let chapters = standard_chapters("kjv", "PSA");
        assert_eq!(chapters.len(), 150);
        assert_eq!(chapters[0].number, "1");
        assert_eq!(chapters[149].id, "kjv.PSA.150");
        assert_eq!(chapters[0].reference, "Psalms 1");
        assert_eq!(standard_chapters("kjv", "XYZ").len(), 1);
    }
}
