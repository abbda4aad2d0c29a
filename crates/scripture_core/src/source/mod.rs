//! Raw translation retrieval.
//!
//! # Responsibility
//! - Define the transport seam ([`SourceReader`]) and its implementations.
//! - Walk candidate locations, identifier casings and book-key spellings in
//!   preference order until one resolves.
//!
//! # Invariants
//! - Candidates are tried sequentially; a later one is read only after the
//!   earlier one definitively failed.
//! - Every individual failure is recoverable; exhaustion is `NotFound`.

pub mod fetcher;
pub mod location;
pub mod reader;

pub use fetcher::{looks_like_bible_data, SourceFetcher};
pub use location::{chapter_key_candidates, identifier_candidates, IdentifierCasing, LocationTemplate};
pub use reader::{ChainedSourceReader, FsSourceReader, HttpSourceReader, MemorySourceReader};

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SourceResult<T> = Result<T, SourceError>;

/// Retrieval failure for one candidate or one whole request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Nothing exists at the location.
    Missing { location: String },
    /// The document exists but is not usable translation data.
    Malformed { location: String, reason: String },
    /// Network or file-read failure.
    Transport { location: String, message: String },
    /// Every candidate was exhausted for the request.
    NotFound {
        bible_id: String,
        book_id: Option<String>,
        chapter: Option<String>,
    },
}

impl SourceError {
    pub fn missing(location: impl Into<String>) -> Self {
        Self::Missing {
            location: location.into(),
        }
    }

    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn not_found(bible_id: &str, book_id: Option<&str>, chapter: Option<&str>) -> Self {
        Self::NotFound {
            bible_id: bible_id.to_string(),
            book_id: book_id.map(str::to_string),
            chapter: chapter.map(str::to_string),
        }
    }

    /// Stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing",
            Self::Malformed { .. } => "malformed",
            Self::Transport { .. } => "transport",
            Self::NotFound { .. } => "not_found",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { location } => write!(f, "no document at `{location}`"),
            Self::Malformed { location, reason } => {
                write!(f, "malformed document at `{location}`: {reason}")
            }
            Self::Transport { location, message } => {
                write!(f, "failed to read `{location}`: {message}")
            }
            Self::NotFound {
                bible_id,
                book_id,
                chapter,
            } => {
                write!(f, "no source resolves `{bible_id}`")?;
                if let Some(book_id) = book_id {
                    write!(f, " book `{book_id}`")?;
                }
                if let Some(chapter) = chapter {
                    write!(f, " chapter `{chapter}`")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for SourceError {}

/// Transport seam: returns the raw text stored at a location.
pub trait SourceReader {
    /// Short reader name for log lines.
    fn name(&self) -> &'static str;
    fn read_text(&self, location: &str) -> SourceResult<String>;
}

impl<R: SourceReader + ?Sized> SourceReader for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read_text(&self, location: &str) -> SourceResult<String> {
        (**self).read_text(location)
    }
}

#[cfg(test)]
mod tests {
    use super::SourceError;

    #[test]
    fn not_found_names_the_request() {
        let err = SourceError::not_found("kjv", Some("GEN"), Some("1"));
        assert_eq!(err.to_string(), "no source resolves `kjv` book `GEN` chapter `1`");
        assert_eq!(err.code(), "not_found");
        assert_eq!(
            SourceError::not_found("kjv", None, None).to_string(),
            "no source resolves `kjv`"
        );
    }
}
