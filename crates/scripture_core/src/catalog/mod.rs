//! Static catalogs: built-in translations and the canonical book structure.
//!
//! These tables are the universal fallback tier. Resolvers return them when
//! no source document can be read.

pub mod books;
pub mod versions;

pub use books::{
    book_key_candidates, book_name_for_key, canonical_book_id, find_standard_book,
    normalize_book_key, standard_books, standard_chapter_count, standard_chapters, StandardBook,
    Testament, STANDARD_BOOKS,
};
pub use versions::{builtin_versions, default_probe_ids, discovered_version, step_version_code};
