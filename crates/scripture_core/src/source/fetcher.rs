//! Candidate-walking fetch strategy over one [`SourceReader`].
//!
//! # Responsibility
//! - Resolve a translation id to its decoded document through ordered
//!   location templates and identifier casings.
//! - Resolve book and chapter keys inside a document through ordered
//!   spelling candidates.
//! - Fetch USFM and STEP text for translations served in those formats.
//!
//! # Invariants
//! - Only documents passing [`looks_like_bible_data`] are accepted.
//! - A candidate document that lacks the requested book or chapter is
//!   skipped; the next candidate document is tried.
//! - The document memo never holds more than `memo_capacity` documents.

use crate::catalog::{book_key_candidates, step_version_code};
use crate::config::SourceConfig;
use crate::source::location::{chapter_key_candidates, identifier_candidates};
use crate::source::{SourceError, SourceReader, SourceResult};
use log::{debug, info, warn};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

struct MemoEntry {
    bible_id: String,
    location: String,
    document: Rc<Value>,
}

/// Sequential fetch strategy parameterized by location templates.
pub struct SourceFetcher {
    reader: Box<dyn SourceReader>,
    config: SourceConfig,
    memo: RefCell<VecDeque<MemoEntry>>,
}

impl SourceFetcher {
    pub fn new(reader: Box<dyn SourceReader>, config: SourceConfig) -> Self {
        Self {
            reader,
            config,
            memo: RefCell::new(VecDeque::new()),
        }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Reads and decodes one JSON document without shape validation.
    pub fn read_json(&self, location: &str) -> SourceResult<Value> {
        let text = self.reader.read_text(location)?;
        serde_json::from_str(&text).map_err(|err| SourceError::malformed(location, err.to_string()))
    }

    /// Returns the first candidate document for `bible_id` that looks like
    /// translation data.
    pub fn fetch_translation(&self, bible_id: &str) -> SourceResult<Rc<Value>> {
        self.find_in_documents(bible_id, |document| Some(Rc::clone(document)))
            .ok_or_else(|| SourceError::not_found(bible_id, None, None))
    }

    /// Returns the raw chapter payload for a book/chapter pair.
    ///
    /// Book keys are tried in [`book_key_candidates`] order; for each
    /// spelling an exact key match wins over an ASCII case-insensitive one.
    pub fn fetch_chapter_raw(
        &self,
        bible_id: &str,
        book_id: &str,
        chapter: &str,
    ) -> SourceResult<Value> {
        let started_at = Instant::now();
        let chapter_keys = chapter_key_candidates(chapter);
        let payload = self.find_in_documents(bible_id, |document| {
            book_matches(document, book_id)
                .into_iter()
                .find_map(|(_, book)| chapter_value(book, &chapter_keys))
                .cloned()
        });

        match payload {
            Some(payload) => {
                info!(
                    "event=chapter_fetch module=source status=ok bible_id={} book_id={} chapter={} duration_ms={}",
                    bible_id,
                    book_id,
                    chapter,
                    started_at.elapsed().as_millis()
                );
                Ok(payload)
            }
            None => {
                info!(
                    "event=chapter_fetch module=source status=not_found bible_id={} book_id={} chapter={} duration_ms={}",
                    bible_id,
                    book_id,
                    chapter,
                    started_at.elapsed().as_millis()
                );
                Err(SourceError::not_found(bible_id, Some(book_id), Some(chapter)))
            }
        }
    }

    /// Top-level book keys of the translation document, in source order.
    pub fn book_keys(&self, bible_id: &str) -> SourceResult<Vec<String>> {
        let document = self.fetch_translation(bible_id)?;
        let keys: Vec<String> = document
            .as_object()
            .map(|books| books.keys().cloned().collect())
            .unwrap_or_default();
        if keys.is_empty() {
            return Err(SourceError::not_found(bible_id, None, None));
        }
        Ok(keys)
    }

    /// Chapter keys of one book, in source order.
    ///
    /// Array-shaped books yield `1..=len`.
    pub fn chapter_keys(&self, bible_id: &str, book_id: &str) -> SourceResult<Vec<String>> {
        self.find_in_documents(bible_id, |document| {
            book_matches(document, book_id)
                .into_iter()
                .map(|(_, book)| chapter_keys_of(book))
                .find(|keys| !keys.is_empty())
        })
        .ok_or_else(|| SourceError::not_found(bible_id, Some(book_id), None))
    }

    /// Raw USFM text of one book for a `github-unfolding` translation.
    pub fn fetch_usfm_book(&self, bible_id: &str, book_id: &str) -> SourceResult<String> {
        let book_key = crate::catalog::canonical_book_id(book_id).unwrap_or(book_id);
        let locations: Vec<String> = self
            .config
            .usfm_templates
            .iter()
            .map(|template| template.render(&bible_id.to_lowercase(), Some(book_key), None))
            .collect();
        self.first_text(&locations)
            .ok_or_else(|| SourceError::not_found(bible_id, Some(book_id), None))
    }

    /// Raw STEP Bible text of one chapter for a `github-step` translation.
    pub fn fetch_step_chapter(
        &self,
        bible_id: &str,
        book_id: &str,
        chapter: &str,
    ) -> SourceResult<String> {
        let version_code = step_version_code(bible_id);
        let book_key = crate::catalog::canonical_book_id(book_id).unwrap_or(book_id);
        let locations: Vec<String> = self
            .config
            .step_templates
            .iter()
            .map(|template| template.render(version_code, Some(book_key), Some(chapter)))
            .collect();
        self.first_text(&locations)
            .ok_or_else(|| SourceError::not_found(bible_id, Some(book_id), Some(chapter)))
    }

    /// Drops every memoized document.
    pub fn clear_memo(&self) {
        self.memo.borrow_mut().clear();
    }

    pub fn memo_len(&self) -> usize {
        self.memo.borrow().len()
    }

    /// Candidate JSON locations for a translation, in preference order.
    pub fn translation_locations(&self, bible_id: &str) -> Vec<String> {
        let identifiers = identifier_candidates(bible_id, &self.config.casings);
        let mut locations: Vec<String> = Vec::new();
        for template in &self.config.json_templates {
            for identifier in &identifiers {
                let location = template.render(identifier, None, None);
                if !locations.contains(&location) {
                    locations.push(location);
                }
            }
        }
        locations
    }

    fn find_in_documents<T>(
        &self,
        bible_id: &str,
        mut accept: impl FnMut(&Rc<Value>) -> Option<T>,
    ) -> Option<T> {
        let memoized = self.memoized(bible_id);
        if let Some((_, document)) = &memoized {
            if let Some(found) = accept(document) {
                debug!("event=document_memo module=source status=hit bible_id={bible_id}");
                return Some(found);
            }
        }

        for location in self.translation_locations(bible_id) {
            if memoized
                .as_ref()
                .is_some_and(|(memo_location, _)| *memo_location == location)
            {
                continue;
            }
            let document = match self.read_translation(&location) {
                Ok(document) => Rc::new(document),
                Err(err) => {
                    log_candidate_miss(bible_id, &err);
                    continue;
                }
            };
            if memoized.is_none() {
                self.remember(bible_id, &location, Rc::clone(&document));
            }
            if let Some(found) = accept(&document) {
                return Some(found);
            }
            debug!(
                "event=document_candidate module=source status=skip bible_id={} location={} reason=request_unresolved",
                bible_id, location
            );
        }
        None
    }

    fn read_translation(&self, location: &str) -> SourceResult<Value> {
        let document = self.read_json(location)?;
        if !looks_like_bible_data(&document) {
            return Err(SourceError::malformed(location, "not translation data"));
        }
        Ok(document)
    }

    fn first_text(&self, locations: &[String]) -> Option<String> {
        locations
            .iter()
            .find_map(|location| match self.reader.read_text(location) {
                Ok(text) if !text.trim().is_empty() => Some(text),
                Ok(_) => None,
                Err(err) => {
                    log_candidate_miss(location, &err);
                    None
                }
            })
    }

    fn memoized(&self, bible_id: &str) -> Option<(String, Rc<Value>)> {
        let key = bible_id.to_lowercase();
        self.memo
            .borrow()
            .iter()
            .find(|entry| entry.bible_id == key)
            .map(|entry| (entry.location.clone(), Rc::clone(&entry.document)))
    }

    fn remember(&self, bible_id: &str, location: &str, document: Rc<Value>) {
        let capacity = self.config.memo_capacity;
        if capacity == 0 {
            return;
        }
        let key = bible_id.to_lowercase();
        let mut memo = self.memo.borrow_mut();
        memo.retain(|entry| entry.bible_id != key);
        while memo.len() >= capacity {
            memo.pop_front();
        }
        memo.push_back(MemoEntry {
            bible_id: key,
            location: location.to_string(),
            document,
        });
    }
}

fn log_candidate_miss(subject: &str, err: &SourceError) {
    match err {
        SourceError::Transport { .. } => warn!(
            "event=source_candidate module=source status=error subject={} error_code={} error={}",
            subject,
            err.code(),
            err
        ),
        _ => debug!(
            "event=source_candidate module=source status=miss subject={} error_code={}",
            subject,
            err.code()
        ),
    }
}

/// Shape check for translation documents.
///
/// The first book must be a non-empty object whose first chapter is an array
/// or object.
pub fn looks_like_bible_data(value: &Value) -> bool {
    let Some((_, first_book)) = value.as_object().and_then(|books| books.iter().next()) else {
        return false;
    };
    let Some((_, first_chapter)) = first_book
        .as_object()
        .and_then(|chapters| chapters.iter().next())
    else {
        return false;
    };
    first_chapter.is_array() || first_chapter.is_object()
}

/// Book entries matching `book_id`, in candidate order without repeats.
pub fn book_matches<'v>(document: &'v Value, book_id: &str) -> Vec<(&'v str, &'v Value)> {
    let Some(books) = document.as_object() else {
        return Vec::new();
    };
    let mut matches: Vec<(&'v str, &'v Value)> = Vec::new();
    let mut push = |key: &'v str, value: &'v Value| {
        if !value.is_null() && !matches.iter().any(|(seen, _)| *seen == key) {
            matches.push((key, value));
        }
    };
    for candidate in book_key_candidates(book_id) {
        for (key, value) in books {
            if *key == candidate {
                push(key.as_str(), value);
            }
        }
        for (key, value) in books {
            if key.eq_ignore_ascii_case(&candidate) {
                push(key.as_str(), value);
            }
        }
    }
    matches
}

fn chapter_value<'v>(book: &'v Value, chapter_keys: &[String]) -> Option<&'v Value> {
    chapter_keys.iter().find_map(|key| {
        let value = match book {
            Value::Object(chapters) => chapters.get(key.as_str()),
            Value::Array(chapters) => key
                .parse::<usize>()
                .ok()
                .filter(|number| *number > 0)
                .and_then(|number| chapters.get(number - 1)),
            _ => None,
        };
        value.filter(|value| !value.is_null())
    })
}

fn chapter_keys_of(book: &Value) -> Vec<String> {
    match book {
        Value::Object(chapters) => chapters.keys().cloned().collect(),
        Value::Array(chapters) => (1..=chapters.len()).map(|n| n.to_string()).collect(),
        _ => Vec::new(),
    }
}
