//! Transport implementations behind [`SourceReader`].
//!
//! # Invariants
//! - An absent document is always `SourceError::Missing`, whatever the
//!   transport, so callers can move to the next candidate quietly.
//! - Readers never decode; they return raw text.

use crate::source::{SourceError, SourceReader, SourceResult};
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Reads documents relative to a local directory.
#[derive(Debug, Clone)]
pub struct FsSourceReader {
    root: PathBuf,
}

impl FsSourceReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, location: &str) -> Option<PathBuf> {
        if is_absolute_url(location) {
            return None;
        }
        let relative = Path::new(location.trim_start_matches('/'));
        let escapes_root = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if escapes_root {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl SourceReader for FsSourceReader {
    fn name(&self) -> &'static str {
        "fs"
    }

    fn read_text(&self, location: &str) -> SourceResult<String> {
        let path = self
            .resolve(location)
            .ok_or_else(|| SourceError::missing(location))?;
        std::fs::read_to_string(&path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => SourceError::missing(location),
            _ => SourceError::transport(location, err.to_string()),
        })
    }
}

/// Reads documents over HTTP(S) with a blocking client.
///
/// Relative locations are joined to the base URL; absolute URLs are used as
/// given.
pub struct HttpSourceReader {
    base_url: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpSourceReader {
    pub fn new(base_url: Option<String>, timeout: Duration) -> SourceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scripture-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| SourceError::transport("client", describe_http_error(&err)))?;
        Ok(Self {
            base_url: base_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            client,
        })
    }

    /// Full URL for a location, or `None` when a relative location has no base.
    pub fn url_for(&self, location: &str) -> Option<String> {
        if is_absolute_url(location) {
            return Some(location.to_string());
        }
        self.base_url
            .as_ref()
            .map(|base| format!("{base}/{}", location.trim_start_matches('/')))
    }
}

impl SourceReader for HttpSourceReader {
    fn name(&self) -> &'static str {
        "http"
    }

    fn read_text(&self, location: &str) -> SourceResult<String> {
        let url = self
            .url_for(location)
            .ok_or_else(|| SourceError::missing(location))?;
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| SourceError::transport(&url, describe_http_error(&err)))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::missing(&url));
        }
        if !status.is_success() {
            return Err(SourceError::transport(&url, format!("http status {status}")));
        }
        response
            .text()
            .map_err(|err| SourceError::transport(&url, describe_http_error(&err)))
    }
}

fn describe_http_error(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_decode() {
        "decode"
    } else if err.is_request() {
        "request"
    } else {
        "other"
    };
    format!("{kind}: {err}")
}

/// In-process documents keyed by location.
///
/// Records every location it is asked for, in order.
#[derive(Debug, Default)]
pub struct MemorySourceReader {
    documents: HashMap<String, String>,
    reads: RefCell<Vec<String>>,
}

impl MemorySourceReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, location: &str, text: impl Into<String>) -> Self {
        self.insert(location, text);
        self
    }

    pub fn insert(&mut self, location: &str, text: impl Into<String>) {
        self.documents
            .insert(normalize_location(location).to_string(), text.into());
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Locations requested so far.
    pub fn reads(&self) -> Vec<String> {
        self.reads.borrow().clone()
    }
}

impl SourceReader for MemorySourceReader {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read_text(&self, location: &str) -> SourceResult<String> {
        self.reads.borrow_mut().push(location.to_string());
        self.documents
            .get(normalize_location(location))
            .cloned()
            .ok_or_else(|| SourceError::missing(location))
    }
}

/// Tries readers in order; the first success wins.
///
/// When every reader fails, the first non-`Missing` error is reported so
/// transport problems stay visible.
#[derive(Default)]
pub struct ChainedSourceReader {
    readers: Vec<Box<dyn SourceReader>>,
}

impl ChainedSourceReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reader(mut self, reader: Box<dyn SourceReader>) -> Self {
        self.readers.push(reader);
        self
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Reader names in lookup order.
    pub fn reader_names(&self) -> Vec<&'static str> {
        self.readers.iter().map(|reader| reader.name()).collect()
    }
}

impl SourceReader for ChainedSourceReader {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn read_text(&self, location: &str) -> SourceResult<String> {
        let mut reported: Option<SourceError> = None;
        for reader in &self.readers {
            match reader.read_text(location) {
                Ok(text) => return Ok(text),
                Err(err) => {
                    debug!(
                        "event=source_read module=source status=miss reader={} error_code={}",
                        reader.name(),
                        err.code()
                    );
                    let replace = match &reported {
                        None => true,
                        Some(previous) => {
                            matches!(previous, SourceError::Missing { .. })
                                && !matches!(err, SourceError::Missing { .. })
                        }
                    };
                    if replace {
                        reported = Some(err);
                    }
                }
            }
        }
        Err(reported.unwrap_or_else(|| SourceError::missing(location)))
    }
}

pub(crate) fn is_absolute_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn normalize_location(location: &str) -> &str {
    location.trim().trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_reader_maps_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kjv.json"), "{}").unwrap();
        let reader = FsSourceReader::new(dir.path());

        assert_eq!(reader.read_text("kjv.json").unwrap(), "{}");
        assert_eq!(reader.read_text("/kjv.json").unwrap(), "{}");
        assert!(matches!(
            reader.read_text("niv.json"),
            Err(SourceError::Missing { .. })
        ));
        assert!(matches!(
            reader.read_text("../kjv.json"),
            Err(SourceError::Missing { .. })
        ));
        assert!(matches!(
            reader.read_text("https://example.org/kjv.json"),
            Err(SourceError::Missing { .. })
        ));
    }

    #[test]
    fn http_reader_joins_relative_locations() {
        let reader = HttpSourceReader::new(
            Some("https://example.org/bibles/".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            reader.url_for("data/kjv.json").as_deref(),
            Some("https://example.org/bibles/data/kjv.json")
        );
        assert_eq!(
            reader.url_for("https://other.org/x.usfm").as_deref(),
            Some("https://other.org/x.usfm")
        );

        let no_base = HttpSourceReader::new(None, Duration::from_secs(5)).unwrap();
        assert_eq!(no_base.url_for("kjv.json"), None);
        assert!(matches!(
            no_base.read_text("kjv.json"),
            Err(SourceError::Missing { .. })
        ));
    }

    #[test]
    fn memory_reader_records_reads() {
        let reader = MemorySourceReader::new().with_document("/kjv.json", "{}");
        assert!(reader.read_text("kjv.json").is_ok());
        assert!(reader.read_text("KJV.json").is_err());
        assert_eq!(reader.reads(), vec!["kjv.json", "KJV.json"]);
    }

    struct FailingReader;

    impl SourceReader for FailingReader {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn read_text(&self, location: &str) -> SourceResult<String> {
            Err(SourceError::transport(location, "connect: refused"))
        }
    }

    #[test]
    fn chain_prefers_first_success_and_reports_transport_errors() {
        let chain = ChainedSourceReader::new()
            .with_reader(Box::new(MemorySourceReader::new()))
            .with_reader(Box::new(FailingReader))
            .with_reader(Box::new(MemorySourceReader::new().with_document("a.json", "[]")));

        assert_eq!(chain.read_text("a.json").unwrap(), "[]");
        assert!(matches!(
            chain.read_text("b.json"),
            Err(SourceError::Transport { .. })
        ));
        assert!(matches!(
            ChainedSourceReader::new().read_text("b.json"),
            Err(SourceError::Missing { .. })
        ));
    }
}
