//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level retrieval functions to Dart via FRB.
//! - Flatten core models into plain envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Retrieval calls always return an envelope; a failed cache database
//!   degrades to an in-memory cache instead of an error.
//!
//! # See also
//! - crates/scripture_core/src/service/scripture_service.rs

use log::warn;
use scripture_core::{
    build_reader, core_version as core_version_inner, init_logging as init_logging_inner,
    open_db, ping as ping_inner, BibleVersion, Book, Chapter, ChapterContent, MemoryCacheStore,
    ScriptDirection, ScriptureConfig, ScriptureService, SystemClock, Verse,
};
use std::rc::Rc;
use std::sync::OnceLock;

static FFI_CONFIG: OnceLock<ScriptureConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Translation row for version pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionItem {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    /// ISO-like language id such as `en` or `he`.
    pub language_id: String,
    pub language_name: String,
    pub right_to_left: bool,
    /// Provenance tag (`static|github-unfolding|local-json|...`).
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookItem {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterItem {
    /// Chapter id in `{bible}.{BOOK}.{n}` form.
    pub id: String,
    pub number: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseItem {
    pub id: String,
    pub reference: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionsResponse {
    pub items: Vec<VersionItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooksResponse {
    pub items: Vec<BookItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaptersResponse {
    pub items: Vec<ChapterItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersesResponse {
    pub items: Vec<VerseItem>,
    pub message: String,
}

/// Rendered chapter envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterTextResponse {
    pub id: String,
    pub reference: String,
    /// Normalized HTML-like markup, never empty.
    pub content: String,
    /// False when `content` is the "not available" block.
    pub available: bool,
    pub verse_count: u32,
    pub message: String,
}

/// Lists every known translation, built-ins first.
///
/// # FFI contract
/// - Sync call; may read local or remote sources on a cache miss.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn bible_versions() -> VersionsResponse {
    let (versions, degraded) = with_service(|service| service.get_bible_versions());
    let items: Vec<VersionItem> = versions.into_iter().map(to_version_item).collect();
    VersionsResponse {
        message: list_message(items.len(), degraded),
        items,
    }
}

/// Lists books of one translation; falls back to the standard 66 books.
#[flutter_rust_bridge::frb(sync)]
pub fn books(bible_id: String) -> BooksResponse {
    let bible_id = bible_id.trim().to_string();
    let (books, degraded) = with_service(|service| service.get_books(&bible_id));
    let items: Vec<BookItem> = books.into_iter().map(to_book_item).collect();
    BooksResponse {
        message: list_message(items.len(), degraded),
        items,
    }
}

/// Lists chapters of one book.
#[flutter_rust_bridge::frb(sync)]
pub fn chapters(bible_id: String, book_id: String) -> ChaptersResponse {
    let bible_id = bible_id.trim().to_string();
    let book_id = book_id.trim().to_string();
    let (chapters, degraded) =
        with_service(|service| service.get_chapters(&bible_id, &book_id));
    let items: Vec<ChapterItem> = chapters.into_iter().map(to_chapter_item).collect();
    ChaptersResponse {
        message: list_message(items.len(), degraded),
        items,
    }
}

/// Loads rendered chapter content.
///
/// # FFI contract
/// - Never panics; unavailable chapters return the sentinel markup with
///   `available=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn chapter_text(bible_id: String, chapter_id: String) -> ChapterTextResponse {
    let bible_id = bible_id.trim().to_string();
    let chapter_id = chapter_id.trim().to_string();
    let (content, degraded) =
        with_service(|service| service.get_chapter_text(&bible_id, &chapter_id));
    to_chapter_text_response(content, degraded)
}

/// Loads verse records of one chapter; empty when no verse data exists.
#[flutter_rust_bridge::frb(sync)]
pub fn verses(bible_id: String, chapter_id: String) -> VersesResponse {
    let bible_id = bible_id.trim().to_string();
    let chapter_id = chapter_id.trim().to_string();
    let (verses, degraded) = with_service(|service| service.get_verses(&bible_id, &chapter_id));
    let items: Vec<VerseItem> = verses.into_iter().map(to_verse_item).collect();
    VersesResponse {
        message: list_message(items.len(), degraded),
        items,
    }
}

/// Drops every persisted cache; returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn clear_cache() -> String {
    let ((), degraded) = with_service(|service| service.clear_cache());
    degraded.unwrap_or_default()
}

fn resolve_config() -> ScriptureConfig {
    FFI_CONFIG
        .get_or_init(|| {
            ScriptureConfig::from_env().unwrap_or_else(|err| {
                warn!("event=config_load module=ffi status=fallback error={err}");
                ScriptureConfig::default()
            })
        })
        .clone()
}

/// Runs `f` against a service bound to the cache database.
///
/// Returns the degradation message when the database could not be opened.
fn with_service<T>(f: impl FnOnce(&ScriptureService<'_>) -> T) -> (T, Option<String>) {
    let config = resolve_config();
    let reader = build_reader(&config);
    let db_path = config.resolved_db_path();
    match open_db(&db_path) {
        Ok(conn) => {
            let service = ScriptureService::new(&conn, config, reader);
            (f(&service), None)
        }
        Err(err) => {
            warn!(
                "event=db_open module=ffi status=fallback error_code=db_open_failed error={err}"
            );
            let service = ScriptureService::with_store(
                config,
                reader,
                MemoryCacheStore::new(),
                Rc::new(SystemClock),
            );
            (f(&service), Some(format!("cache database unavailable: {err}")))
        }
    }
}

fn list_message(count: usize, degraded: Option<String>) -> String {
    degraded.unwrap_or_else(|| format!("Found {count} item(s)."))
}

fn to_version_item(version: BibleVersion) -> VersionItem {
    VersionItem {
        id: version.id,
        name: version.name,
        abbreviation: version.abbreviation,
        right_to_left: version.language.script_direction == ScriptDirection::Rtl,
        language_id: version.language.id,
        language_name: version.language.name,
        source: version.source.as_str().to_string(),
    }
}

fn to_book_item(book: Book) -> BookItem {
    BookItem {
        id: book.id,
        name: book.name,
        abbreviation: book.abbreviation,
    }
}

fn to_chapter_item(chapter: Chapter) -> ChapterItem {
    ChapterItem {
        id: chapter.id,
        number: chapter.number,
        reference: chapter.reference,
    }
}

fn to_verse_item(verse: Verse) -> VerseItem {
    VerseItem {
        id: verse.id,
        reference: verse.reference,
        text: verse.text,
    }
}

fn to_chapter_text_response(
    content: ChapterContent,
    degraded: Option<String>,
) -> ChapterTextResponse {
    let available = content.is_available();
    let verse_count = u32::try_from(content.verse_count()).unwrap_or(u32::MAX);
    let message = degraded.unwrap_or_else(|| {
        if available {
            format!("Loaded {verse_count} verse(s).")
        } else {
            "Chapter not available.".to_string()
        }
    });
    ChapterTextResponse {
        id: content.id,
        reference: content.reference,
        content: content.content,
        available,
        verse_count,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        bible_versions, books, chapter_text, chapters, core_version, init_logging, ping,
        to_chapter_text_response,
    };
    use scripture_core::ChapterContent;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn bible_versions_include_builtin_catalog() {
        let response = bible_versions();
        let kjv = response
            .items
            .iter()
            .find(|item| item.id == "kjv")
            .expect("kjv should be listed");
        assert_eq!(kjv.language_id, "en");
        assert!(!kjv.right_to_left);
        assert!(response
            .items
            .iter()
            .any(|item| item.id == "step-hebrew" && item.right_to_left));
    }

    #[test]
    fn static_books_and_chapters_use_standard_tables() {
        let response = books(" kjv ".to_string());
        assert_eq!(response.items.len(), 66);
        assert_eq!(response.items[0].id, "GEN");

        let response = chapters("kjv".to_string(), "GEN".to_string());
        assert_eq!(response.items.len(), 50);
        assert_eq!(response.items[49].id, "kjv.GEN.50");
        assert_eq!(response.items[49].reference, "Genesis 50");
    }

    #[test]
    fn chapter_text_always_returns_content() {
        let response = chapter_text("kjv".to_string(), "kjv.GEN.1".to_string());
        assert_eq!(response.id, "kjv.GEN.1");
        assert_eq!(response.reference, "Genesis 1");
        assert!(!response.content.is_empty());
        assert_eq!(response.available, response.verse_count > 0);
    }

    #[test]
    fn sentinel_maps_to_unavailable_envelope() {
        let content = ChapterContent::unavailable("kjv.GEN.1", "kjv", "Genesis", "1");
        let response = to_chapter_text_response(content, None);
        assert!(!response.available);
        assert_eq!(response.verse_count, 0);
        assert_eq!(response.message, "Chapter not available.");

        let degraded = ChapterContent::unavailable("x.GEN.1", "x", "Genesis", "1");
        let response = to_chapter_text_response(degraded, Some("cache database unavailable".into()));
        assert_eq!(response.message, "cache database unavailable");
    }
}
