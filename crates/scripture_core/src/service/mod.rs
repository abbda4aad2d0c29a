//! Retrieval services.
//!
//! # Responsibility
//! - Turn fetcher results into catalog, book, chapter and text answers.
//! - Own one cache instance per resolver.
//!
//! # Invariants
//! - Every public retrieval method resolves to a best-effort value.

pub mod book_service;
pub mod chapter_service;
pub mod scripture_service;
pub mod text_service;
pub mod version_service;

pub use scripture_service::ScriptureService;
