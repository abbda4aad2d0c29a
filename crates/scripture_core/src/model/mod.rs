//! Normalized scripture data model.
//!
//! # Responsibility
//! - Define the uniform shapes every resolver returns to callers.
//! - Keep serialized field names stable for cache persistence and FFI.
//!
//! # Invariants
//! - `BibleVersion::id` is unique within one merged catalog.
//! - `Book::id` is unique within one `bible_id`.
//! - `Chapter::id` is always `{bible_id}.{book_id}.{number}`.

pub mod book;
pub mod content;
pub mod version;
