//! Scripture data normalization and retrieval core.
//! This crate is the single source of truth for retrieval invariants.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod parser;
pub mod service;
pub mod source;

pub use cache::{Cache, CacheStore, Clock, ManualClock, MemoryCacheStore, SqliteCacheStore, SystemClock};
pub use config::{build_reader, reader_chain, CacheConfig, ConfigError, ScriptureConfig, SourceConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, Chapter, ChapterId, Verse};
pub use model::content::{ChapterContent, ParsedVerse};
pub use model::version::{BibleVersion, Language, ScriptDirection, SourceTag};
pub use service::ScriptureService;
pub use source::{
    ChainedSourceReader, FsSourceReader, HttpSourceReader, MemorySourceReader, SourceError,
    SourceFetcher, SourceReader, SourceResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
