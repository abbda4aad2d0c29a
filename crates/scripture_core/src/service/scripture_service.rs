//! Public retrieval facade.
//!
//! # Responsibility
//! - Wire one fetcher and one cache instance per resolver together.
//! - Expose the retrieval entry points consumed by UI and FFI layers.
//!
//! # Invariants
//! - No entry point returns `Result`; failures degrade to fallback tiers.
//! - Each resolver owns a distinct storage key in the durable store.

use crate::cache::{Cache, CacheStore, Clock, SqliteCacheStore, SystemClock};
use crate::catalog::builtin_versions;
use crate::config::ScriptureConfig;
use crate::model::book::{Book, Chapter, Verse};
use crate::model::content::ChapterContent;
use crate::model::version::{BibleVersion, SourceTag};
use crate::service::book_service::BookService;
use crate::service::chapter_service::ChapterService;
use crate::service::text_service::TextService;
use crate::service::version_service::VersionService;
use crate::source::{SourceFetcher, SourceReader};
use log::info;
use rusqlite::Connection;
use std::rc::Rc;

pub const VERSIONS_STORAGE_KEY: &str = "scripture_cache.versions";
pub const BOOKS_STORAGE_KEY: &str = "scripture_cache.books";
pub const CHAPTERS_STORAGE_KEY: &str = "scripture_cache.chapters";
pub const TEXT_STORAGE_KEY: &str = "scripture_cache.text";
pub const VERSES_STORAGE_KEY: &str = "scripture_cache.verses";

/// Entry point for every retrieval operation.
pub struct ScriptureService<'a> {
    fetcher: Rc<SourceFetcher>,
    versions: VersionService<'a>,
    books: BookService<'a>,
    chapters: ChapterService<'a>,
    text: TextService<'a>,
}

impl<'a> ScriptureService<'a> {
    /// Creates a service persisting its caches in `conn`.
    pub fn new(conn: &'a Connection, config: ScriptureConfig, reader: Box<dyn SourceReader>) -> Self {
        Self::with_clock(conn, config, reader, Rc::new(SystemClock))
    }

    pub fn with_clock(
        conn: &'a Connection,
        config: ScriptureConfig,
        reader: Box<dyn SourceReader>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self::with_store(config, reader, SqliteCacheStore::new(conn), clock)
    }

    /// Creates a service over any cache store; each cache gets its own clone.
    pub fn with_store<S>(
        config: ScriptureConfig,
        reader: Box<dyn SourceReader>,
        store: S,
        clock: Rc<dyn Clock>,
    ) -> Self
    where
        S: CacheStore + Clone + 'a,
    {
        let expiry = config.cache;
        let cache = |storage_key: &str, ttl| -> Cache<'a> {
            Cache::open(storage_key, ttl, Box::new(store.clone()), Rc::clone(&clock))
        };
        let fetcher = Rc::new(SourceFetcher::new(reader, config.sources));

        info!(
            "event=service_init module=service status=ok json_templates={} probe_ids={}",
            fetcher.config().json_templates.len(),
            fetcher.config().probe_ids.len()
        );

        Self {
            versions: VersionService::new(
                Rc::clone(&fetcher),
                cache(VERSIONS_STORAGE_KEY, expiry.versions()),
            ),
            books: BookService::new(Rc::clone(&fetcher), cache(BOOKS_STORAGE_KEY, expiry.books())),
            chapters: ChapterService::new(
                Rc::clone(&fetcher),
                cache(CHAPTERS_STORAGE_KEY, expiry.chapters()),
            ),
            text: TextService::new(
                Rc::clone(&fetcher),
                cache(TEXT_STORAGE_KEY, expiry.text()),
                cache(VERSES_STORAGE_KEY, expiry.verses()),
            ),
            fetcher,
        }
    }

    pub fn get_bible_versions(&self) -> Vec<BibleVersion> {
        self.versions.get_versions()
    }

    pub fn get_books(&self, bible_id: &str) -> Vec<Book> {
        self.books.get_books(bible_id, self.source_for(bible_id))
    }

    pub fn get_chapters(&self, bible_id: &str, book_id: &str) -> Vec<Chapter> {
        self.chapters
            .get_chapters(bible_id, book_id, self.source_for(bible_id))
    }

    pub fn get_chapter_text(&self, bible_id: &str, chapter_id: &str) -> ChapterContent {
        self.text
            .get_chapter_text(bible_id, chapter_id, self.source_for(bible_id))
    }

    pub fn get_verses(&self, bible_id: &str, chapter_id: &str) -> Vec<Verse> {
        self.text
            .get_verses(bible_id, chapter_id, self.source_for(bible_id))
    }

    /// Evicts one chapter's cached text and verses.
    pub fn invalidate_chapter_text(&self, bible_id: &str, chapter_id: &str) {
        self.text.invalidate(bible_id, chapter_id);
    }

    /// Drops every cache instance and the document memo.
    pub fn clear_cache(&self) {
        self.versions.cache().clear();
        self.books.cache().clear();
        self.chapters.cache().clear();
        self.text.text_cache().clear();
        self.text.verses_cache().clear();
        self.fetcher.clear_memo();
        info!("event=cache_clear module=service status=ok");
    }

    /// Source tag of a translation; built-ins resolve without discovery and
    /// unknown ids are treated as static.
    pub fn source_for(&self, bible_id: &str) -> SourceTag {
        if let Some(version) = builtin_versions()
            .into_iter()
            .find(|version| version.id == bible_id)
        {
            return version.source;
        }
        self.versions
            .find_version(bible_id)
            .map_or(SourceTag::Static, |version| version.source)
    }
}
