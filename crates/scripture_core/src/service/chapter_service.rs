//! Chapter list use-cases.
//!
//! # Invariants
//! - Discovered chapters keep the source's own keys and order.
//! - Fallback chapters are `1..=count` from the canonical table.

use crate::cache::Cache;
use crate::catalog::{book_name_for_key, standard_chapters};
use crate::model::book::Chapter;
use crate::model::version::SourceTag;
use crate::source::SourceFetcher;
use log::{debug, info};
use std::rc::Rc;

pub fn chapters_cache_key(bible_id: &str, book_id: &str) -> String {
    format!("chapters_{bible_id}_{book_id}")
}

pub struct ChapterService<'a> {
    fetcher: Rc<SourceFetcher>,
    cache: Cache<'a>,
}

impl<'a> ChapterService<'a> {
    pub fn new(fetcher: Rc<SourceFetcher>, cache: Cache<'a>) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &Cache<'a> {
        &self.cache
    }

    /// Ordered chapters of one book; never empty.
    pub fn get_chapters(&self, bible_id: &str, book_id: &str, source: SourceTag) -> Vec<Chapter> {
        let key = chapters_cache_key(bible_id, book_id);
        if let Some(cached) = self.cache.get::<Vec<Chapter>>(&key) {
            debug!(
                "event=chapters_load module=service status=cache_hit bible_id={bible_id} book_id={book_id}"
            );
            return cached;
        }

        let discovered = if source.is_discoverable() {
            self.discover_chapters(bible_id, book_id)
        } else {
            None
        };
        let chapters = discovered.unwrap_or_else(|| {
            if source.is_discoverable() {
                info!(
                    "event=chapters_load module=service status=fallback bible_id={} book_id={}",
                    bible_id, book_id
                );
            }
            standard_chapters(bible_id, book_id)
        });

        info!(
            "event=chapters_load module=service status=ok bible_id={} book_id={} count={}",
            bible_id,
            book_id,
            chapters.len()
        );
        self.cache.set(&key, &chapters);
        chapters
    }

    fn discover_chapters(&self, bible_id: &str, book_id: &str) -> Option<Vec<Chapter>> {
        match self.fetcher.chapter_keys(bible_id, book_id) {
            Ok(keys) => {
                let book_name = book_name_for_key(book_id);
                Some(
                    keys.iter()
                        .map(|number| Chapter::new(bible_id, book_id, number, &book_name))
                        .collect(),
                )
            }
            Err(err) => {
                debug!(
                    "event=chapters_discover module=service status=miss bible_id={} book_id={} error_code={}",
                    bible_id,
                    book_id,
                    err.code()
                );
                None
            }
        }
    }
}
