//! Chapter text and verse use-cases.
//!
//! # Responsibility
//! - Resolve a chapter id to normalized content through every applicable
//!   strategy: translation JSON, then USFM or STEP by source tag.
//! - Derive verse records from the same parsed verses.
//!
//! # Invariants
//! - Sentinel content is never cached; a cached sentinel is evicted on read.
//! - Verses are never fabricated; no verse data yields an empty list.
//! - Every public method resolves to a value.

use crate::cache::Cache;
use crate::catalog::book_name_for_key;
use crate::model::book::{ChapterId, Verse};
use crate::model::content::{reference_for, ChapterContent, ParsedVerse};
use crate::model::version::SourceTag;
use crate::parser::{extract_verses, render_chapter, step::parse_step_text, usfm::extract_usfm_chapter};
use crate::source::SourceFetcher;
use log::{debug, info, warn};
use std::rc::Rc;
use std::time::Instant;

pub fn chapter_text_cache_key(bible_id: &str, chapter_id: &str) -> String {
    format!("chapter_text_{bible_id}_{chapter_id}")
}

pub fn verses_cache_key(bible_id: &str, chapter_id: &str) -> String {
    format!("verses_{bible_id}_{chapter_id}")
}

pub struct TextService<'a> {
    fetcher: Rc<SourceFetcher>,
    text_cache: Cache<'a>,
    verses_cache: Cache<'a>,
}

impl<'a> TextService<'a> {
    pub fn new(fetcher: Rc<SourceFetcher>, text_cache: Cache<'a>, verses_cache: Cache<'a>) -> Self {
        Self {
            fetcher,
            text_cache,
            verses_cache,
        }
    }

    pub fn text_cache(&self) -> &Cache<'a> {
        &self.text_cache
    }

    pub fn verses_cache(&self) -> &Cache<'a> {
        &self.verses_cache
    }

    /// Normalized content for one chapter, or the sentinel when no strategy
    /// yields verses.
    pub fn get_chapter_text(
        &self,
        bible_id: &str,
        chapter_id: &str,
        source: SourceTag,
    ) -> ChapterContent {
        let key = chapter_text_cache_key(bible_id, chapter_id);
        if let Some(cached) = self.text_cache.get::<ChapterContent>(&key) {
            if cached.is_available() {
                debug!(
                    "event=chapter_text_load module=service status=cache_hit chapter_id={chapter_id}"
                );
                return cached;
            }
            info!(
                "event=chapter_text_load module=service status=evict chapter_id={chapter_id} reason=sentinel"
            );
            self.text_cache.remove(&key);
        }

        let Some(parsed) = ChapterId::parse(chapter_id) else {
            warn!(
                "event=chapter_text_load module=service status=error bible_id={} error_code=invalid_chapter_id",
                bible_id
            );
            return ChapterContent::unavailable(chapter_id, bible_id, "", chapter_id.trim());
        };

        let started_at = Instant::now();
        let book_name = book_name_for_key(&parsed.book_id);
        let verses = self.resolve_verses(bible_id, &parsed, source);
        if verses.is_empty() {
            info!(
                "event=chapter_text_load module=service status=fallback bible_id={} chapter_id={} duration_ms={}",
                bible_id,
                chapter_id,
                started_at.elapsed().as_millis()
            );
            return ChapterContent::unavailable(chapter_id, bible_id, &book_name, &parsed.number);
        }

        let content = ChapterContent {
            id: chapter_id.to_string(),
            bible_id: bible_id.to_string(),
            reference: reference_for(&book_name, &parsed.number),
            content: render_chapter(&book_name, &parsed.number, &verses),
        };
        info!(
            "event=chapter_text_load module=service status=ok bible_id={} chapter_id={} verses={} duration_ms={}",
            bible_id,
            chapter_id,
            verses.len(),
            started_at.elapsed().as_millis()
        );
        self.text_cache.set(&key, &content);
        content
    }

    /// Verse records for one chapter; empty when no verse data exists.
    pub fn get_verses(&self, bible_id: &str, chapter_id: &str, source: SourceTag) -> Vec<Verse> {
        let key = verses_cache_key(bible_id, chapter_id);
        if let Some(cached) = self.verses_cache.get::<Vec<Verse>>(&key) {
            if !cached.is_empty() {
                return cached;
            }
            self.verses_cache.remove(&key);
        }

        let Some(parsed) = ChapterId::parse(chapter_id) else {
            warn!(
                "event=verses_load module=service status=error bible_id={} error_code=invalid_chapter_id",
                bible_id
            );
            return Vec::new();
        };

        let book_name = book_name_for_key(&parsed.book_id);
        let verses: Vec<Verse> = self
            .resolve_verses(bible_id, &parsed, source)
            .into_iter()
            .map(|verse| Verse {
                id: format!("{chapter_id}.{}", verse.number),
                org_id: format!("{chapter_id}.{}", verse.number),
                bible_id: bible_id.to_string(),
                book_id: parsed.book_id.clone(),
                chapter_id: chapter_id.to_string(),
                reference: format!(
                    "{} {}:{}",
                    book_name, parsed.number, verse.number
                ),
                text: verse.text,
            })
            .collect();

        info!(
            "event=verses_load module=service status={} bible_id={} chapter_id={} count={}",
            if verses.is_empty() { "empty" } else { "ok" },
            bible_id,
            chapter_id,
            verses.len()
        );
        if !verses.is_empty() {
            self.verses_cache.set(&key, &verses);
        }
        verses
    }

    /// Evicts cached text and verses of one chapter.
    pub fn invalidate(&self, bible_id: &str, chapter_id: &str) {
        self.text_cache
            .remove(&chapter_text_cache_key(bible_id, chapter_id));
        self.verses_cache
            .remove(&verses_cache_key(bible_id, chapter_id));
    }

    fn resolve_verses(
        &self,
        bible_id: &str,
        chapter: &ChapterId,
        source: SourceTag,
    ) -> Vec<ParsedVerse> {
        match self
            .fetcher
            .fetch_chapter_raw(bible_id, &chapter.book_id, &chapter.number)
        {
            Ok(payload) => {
                let verses = extract_verses(&payload);
                if !verses.is_empty() {
                    return verses;
                }
                debug!(
                    "event=chapter_parse module=service status=empty strategy=json chapter_id={chapter}"
                );
            }
            Err(err) => debug!(
                "event=chapter_fetch module=service status=miss strategy=json chapter_id={} error_code={}",
                chapter,
                err.code()
            ),
        }

        let fetched = match source {
            SourceTag::GithubUnfolding => self
                .fetcher
                .fetch_usfm_book(bible_id, &chapter.book_id)
                .map(|usfm| extract_usfm_chapter(&usfm, &chapter.number)),
            SourceTag::GithubStep => self
                .fetcher
                .fetch_step_chapter(bible_id, &chapter.book_id, &chapter.number)
                .map(|text| parse_step_text(&text)),
            _ => return Vec::new(),
        };
        match fetched {
            Ok(verses) => verses,
            Err(err) => {
                debug!(
                    "event=chapter_fetch module=service status=miss strategy={} chapter_id={} error_code={}",
                    source.as_str(),
                    chapter,
                    err.code()
                );
                Vec::new()
            }
        }
    }
}
