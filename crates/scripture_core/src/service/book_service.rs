//! Book list use-cases.
//!
//! # Invariants
//! - Discovered books are used only for discoverable source tags.
//! - Book ids are unique per translation; the first source key wins.
//! - The standard 66-book catalog is the fallback for every failure.

use crate::cache::Cache;
use crate::catalog::{book_name_for_key, standard_books};
use crate::model::book::Book;
use crate::model::version::SourceTag;
use crate::source::SourceFetcher;
use log::{debug, info};
use std::collections::HashSet;
use std::rc::Rc;

pub fn books_cache_key(bible_id: &str) -> String {
    format!("books_{bible_id}")
}

pub struct BookService<'a> {
    fetcher: Rc<SourceFetcher>,
    cache: Cache<'a>,
}

impl<'a> BookService<'a> {
    pub fn new(fetcher: Rc<SourceFetcher>, cache: Cache<'a>) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &Cache<'a> {
        &self.cache
    }

    /// Ordered books of one translation; never empty.
    pub fn get_books(&self, bible_id: &str, source: SourceTag) -> Vec<Book> {
        let key = books_cache_key(bible_id);
        if let Some(cached) = self.cache.get::<Vec<Book>>(&key) {
            debug!("event=books_load module=service status=cache_hit bible_id={bible_id}");
            return cached;
        }

        let books = if source.is_discoverable() {
            match self.discover_books(bible_id) {
                Some(books) => books,
                None => {
                    info!(
                        "event=books_load module=service status=fallback bible_id={} source={}",
                        bible_id,
                        source.as_str()
                    );
                    standard_books(bible_id)
                }
            }
        } else {
            standard_books(bible_id)
        };

        info!(
            "event=books_load module=service status=ok bible_id={} count={}",
            bible_id,
            books.len()
        );
        self.cache.set(&key, &books);
        books
    }

    fn discover_books(&self, bible_id: &str) -> Option<Vec<Book>> {
        let keys = match self.fetcher.book_keys(bible_id) {
            Ok(keys) => keys,
            Err(err) => {
                debug!(
                    "event=books_discover module=service status=miss bible_id={} error_code={}",
                    bible_id,
                    err.code()
                );
                return None;
            }
        };
        let books = books_from_keys(bible_id, &keys);
        (!books.is_empty()).then_some(books)
    }
}

/// Maps raw source keys to books in source order.
pub fn books_from_keys(bible_id: &str, keys: &[String]) -> Vec<Book> {
    let mut seen: HashSet<String> = HashSet::new();
    keys.iter()
        .filter(|key| !key.trim().is_empty())
        .filter_map(|key| {
            let id = key.trim().to_uppercase();
            if !seen.insert(id.clone()) {
                return None;
            }
            let name = book_name_for_key(key);
            Some(Book {
                id: id.clone(),
                bible_id: bible_id.to_string(),
                abbreviation: id,
                name: name.clone(),
                name_long: name,
            })
        })
        .collect()
}
