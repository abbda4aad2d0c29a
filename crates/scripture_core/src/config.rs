//! Runtime configuration for sources, cache expiry and storage.
//!
//! # Responsibility
//! - Provide defaults that work with no configuration at all.
//! - Load overrides from environment variables or a JSON file.
//! - Assemble the [`SourceReader`] chain described by the configuration.
//!
//! # Invariants
//! - Every field has a default; partial JSON files are valid.
//! - `build_reader` never fails; unusable transports are skipped and logged.

use crate::catalog::default_probe_ids;
use crate::source::{
    ChainedSourceReader, FsSourceReader, HttpSourceReader, IdentifierCasing, LocationTemplate,
    MemorySourceReader, SourceReader,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_DATA_DIR: &str = "SCRIPTURE_DATA_DIR";
pub const ENV_REMOTE_URL: &str = "SCRIPTURE_REMOTE_URL";
pub const ENV_DB_PATH: &str = "SCRIPTURE_DB_PATH";
pub const ENV_CACHE_TTL_SECS: &str = "SCRIPTURE_CACHE_TTL_SECS";

const DEFAULT_DB_FILE_NAME: &str = "scripture_core.sqlite3";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MEMO_CAPACITY: usize = 4;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidValue {
        key: &'static str,
        value: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: `{value}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Where translation data lives and how candidates are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Translation JSON locations, in preference order.
    pub json_templates: Vec<LocationTemplate>,
    /// Identifier spellings tried for each template.
    pub casings: Vec<IdentifierCasing>,
    /// USFM book locations for `github-unfolding` translations.
    pub usfm_templates: Vec<LocationTemplate>,
    /// Plain-text chapter locations for `github-step` translations.
    pub step_templates: Vec<LocationTemplate>,
    /// JSON array of version descriptors; `None` skips the manifest.
    pub manifest_location: Option<String>,
    /// Translation ids probed when no manifest is readable.
    pub probe_ids: Vec<String>,
    pub discovery_enabled: bool,
    /// Decoded translation documents kept in memory; 0 disables the memo.
    pub memo_capacity: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            json_templates: vec!["{id}.json".into(), "data/{id}.json".into()],
            casings: IdentifierCasing::DEFAULT_ORDER.to_vec(),
            usfm_templates: vec![
                "https://raw.githubusercontent.com/unfoldingWord-dev/en_{id}/master/{book}.usfm"
                    .into(),
            ],
            step_templates: vec![
                "https://www.stepbible.org/api/getBibleText.jsp?version={id}&reference={BOOK}.{chapter}&options=HNVUG"
                    .into(),
            ],
            manifest_location: Some("versions.json".to_string()),
            probe_ids: default_probe_ids(),
            discovery_enabled: true,
            memo_capacity: DEFAULT_MEMO_CAPACITY,
        }
    }
}

impl SourceConfig {
    /// Whether any source location is a full `http(s)://` URL.
    pub fn uses_absolute_urls(&self) -> bool {
        self.json_templates
            .iter()
            .chain(&self.usfm_templates)
            .chain(&self.step_templates)
            .any(LocationTemplate::is_absolute_url)
            || self
                .manifest_location
                .as_deref()
                .is_some_and(|location| LocationTemplate::from(location).is_absolute_url())
    }
}

/// Expiry per cache instance, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub versions_secs: u64,
    pub books_secs: u64,
    pub chapters_secs: u64,
    pub text_secs: u64,
    pub verses_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            versions_secs: 30 * 60,
            books_secs: 30 * 60,
            chapters_secs: 30 * 60,
            text_secs: 10 * 60,
            verses_secs: 5 * 60,
        }
    }
}

impl CacheConfig {
    /// Same expiry for every instance.
    pub fn uniform(secs: u64) -> Self {
        Self {
            versions_secs: secs,
            books_secs: secs,
            chapters_secs: secs,
            text_secs: secs,
            verses_secs: secs,
        }
    }

    pub fn versions(&self) -> Duration {
        Duration::from_secs(self.versions_secs)
    }

    pub fn books(&self) -> Duration {
        Duration::from_secs(self.books_secs)
    }

    pub fn chapters(&self) -> Duration {
        Duration::from_secs(self.chapters_secs)
    }

    pub fn text(&self) -> Duration {
        Duration::from_secs(self.text_secs)
    }

    pub fn verses(&self) -> Duration {
        Duration::from_secs(self.verses_secs)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptureConfig {
    /// Local directory holding translation files.
    pub data_dir: Option<PathBuf>,
    /// Base URL for relative locations served over HTTP.
    pub remote_base_url: Option<String>,
    /// SQLite file for the durable cache.
    pub db_path: Option<PathBuf>,
    pub sources: SourceConfig,
    pub cache: CacheConfig,
    pub http_timeout_secs: u64,
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            remote_base_url: None,
            db_path: None,
            sources: SourceConfig::default(),
            cache: CacheConfig::default(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl ScriptureConfig {
    /// Defaults overridden by `SCRIPTURE_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let cache = match value(ENV_CACHE_TTL_SECS) {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: ENV_CACHE_TTL_SECS,
                    value: raw.clone(),
                })?;
                CacheConfig::uniform(secs)
            }
            None => CacheConfig::default(),
        };

        Ok(Self {
            data_dir: value(ENV_DATA_DIR).map(PathBuf::from),
            remote_base_url: value(ENV_REMOTE_URL),
            db_path: value(ENV_DB_PATH).map(PathBuf::from),
            cache,
            ..Self::default()
        })
    }

    /// Loads a JSON config file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Database file, defaulting to a file in the temp directory.
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Builds the reader chain: local directory first, then HTTP.
///
/// With no reader configured the result is an empty in-memory reader, so
/// every lookup falls through to the static tiers.
pub fn build_reader(config: &ScriptureConfig) -> Box<dyn SourceReader> {
    let chain = reader_chain(config);
    if chain.is_empty() {
        return Box::new(MemorySourceReader::new());
    }
    Box::new(chain)
}

/// Readers for the configured data directory and remote sources.
///
/// An HTTP reader is always present when a source template is an absolute
/// URL, even without a base URL.
pub fn reader_chain(config: &ScriptureConfig) -> ChainedSourceReader {
    let mut chain = ChainedSourceReader::new();
    if let Some(data_dir) = &config.data_dir {
        chain = chain.with_reader(Box::new(FsSourceReader::new(data_dir)));
    }

    let base_url = config.remote_base_url.clone();
    if base_url.is_some() || config.sources.uses_absolute_urls() {
        match HttpSourceReader::new(base_url, config.http_timeout()) {
            Ok(reader) => chain = chain.with_reader(Box::new(reader)),
            Err(err) => warn!(
                "event=reader_build module=config status=error reader=http error_code={} error={}",
                err.code(),
                err
            ),
        }
    }

    info!(
        "event=reader_build module=config status=ok readers={} data_dir={} remote={}",
        chain.len(),
        config.data_dir.is_some(),
        config.remote_base_url.is_some()
    );
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_use_canonical_locations() {
        let config = ScriptureConfig::default();
        let templates: Vec<&str> = config
            .sources
            .json_templates
            .iter()
            .map(LocationTemplate::as_str)
            .collect();
        assert_eq!(templates, vec!["{id}.json", "data/{id}.json"]);
        assert_eq!(config.sources.casings, IdentifierCasing::DEFAULT_ORDER.to_vec());
        assert_eq!(config.cache.text(), Duration::from_secs(600));
        assert_eq!(config.cache.verses(), Duration::from_secs(300));
    }

    #[test]
    fn lookup_overrides_paths_and_ttl() {
        let values = HashMap::from([
            (ENV_DATA_DIR, "/srv/bibles"),
            (ENV_REMOTE_URL, "  "),
            (ENV_CACHE_TTL_SECS, "60"),
        ]);
        let config =
            ScriptureConfig::from_lookup(|key| values.get(key).map(|value| value.to_string()))
                .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/bibles")));
        assert_eq!(config.remote_base_url, None);
        assert_eq!(config.cache, CacheConfig::uniform(60));
    }

    #[test]
    fn lookup_rejects_non_numeric_ttl() {
        let err = ScriptureConfig::from_lookup(|key| {
            (key == ENV_CACHE_TTL_SECS).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_CACHE_TTL_SECS, .. }));
    }

    #[test]
    fn json_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scripture.json");
        std::fs::write(
            &path,
            r#"{"data_dir": "/data", "cache": {"text_secs": 5}, "sources": {"casings": ["upper"]}}"#,
        )
        .unwrap();

        let config = ScriptureConfig::from_json_file(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/data")));
        assert_eq!(config.cache.text_secs, 5);
        assert_eq!(config.cache.books_secs, 30 * 60);
        assert_eq!(config.sources.casings, vec![IdentifierCasing::Upper]);
        assert_eq!(config.sources.json_templates.len(), 2);
    }

    #[test]
    fn json_file_errors_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(
            ScriptureConfig::from_json_file(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            ScriptureConfig::from_json_file(dir.path().join("absent.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn reader_chain_reads_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kjv.json"), "{}").unwrap();
        let config = ScriptureConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..ScriptureConfig::default()
        };
        let reader = build_reader(&config);
        assert_eq!(reader.name(), "chain");
        assert_eq!(reader.read_text("kjv.json").unwrap(), "{}");
        assert_eq!(reader_chain(&config).reader_names(), vec!["fs", "http"]);
    }

    #[test]
    fn default_templates_reach_remote_sources_without_base_url() {
        let config = ScriptureConfig::default();
        assert!(config.remote_base_url.is_none());
        assert!(config.sources.uses_absolute_urls());
        assert_eq!(reader_chain(&config).reader_names(), vec!["http"]);
        assert_eq!(build_reader(&config).name(), "chain");
    }

    #[test]
    fn relative_only_sources_fall_back_to_memory_reader() {
        let mut config = ScriptureConfig::default();
        config.sources.usfm_templates = vec!["usfm/{id}/{book}.usfm".into()];
        config.sources.step_templates = vec!["step/{id}/{BOOK}.{chapter}.txt".into()];
        assert!(!config.sources.uses_absolute_urls());
        assert!(reader_chain(&config).is_empty());
        assert_eq!(build_reader(&config).name(), "memory");

        config.remote_base_url = Some("https://bibles.example.org".to_string());
        assert_eq!(reader_chain(&config).reader_names(), vec!["http"]);
    }
}
