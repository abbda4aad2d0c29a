//! Version catalog use-cases.
//!
//! # Responsibility
//! - Assemble the translation catalog from built-ins plus discovered sources.
//!
//! # Invariants
//! - Built-ins come first; discovered versions follow in discovery order.
//! - `id` is unique in the merged catalog; the first occurrence wins.
//! - Discovery failures never surface; the built-in list is the floor.

use crate::cache::Cache;
use crate::catalog::{builtin_versions, discovered_version};
use crate::model::version::{BibleVersion, Language, ScriptDirection, SourceTag};
use crate::source::SourceFetcher;
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Instant;

pub const VERSIONS_CACHE_KEY: &str = "all_versions";

/// Version catalog backed by one cache instance.
pub struct VersionService<'a> {
    fetcher: Rc<SourceFetcher>,
    cache: Cache<'a>,
}

impl<'a> VersionService<'a> {
    pub fn new(fetcher: Rc<SourceFetcher>, cache: Cache<'a>) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &Cache<'a> {
        &self.cache
    }

    /// Returns the merged catalog, from cache when fresh.
    pub fn get_versions(&self) -> Vec<BibleVersion> {
        if let Some(cached) = self.cache.get::<Vec<BibleVersion>>(VERSIONS_CACHE_KEY) {
            debug!(
                "event=versions_load module=service status=cache_hit count={}",
                cached.len()
            );
            return cached;
        }

        let started_at = Instant::now();
        let discovered = if self.fetcher.config().discovery_enabled {
            self.discover_versions()
        } else {
            Vec::new()
        };
        let discovered_count = discovered.len();
        let versions = merge_versions(builtin_versions(), discovered);
        info!(
            "event=versions_load module=service status=ok count={} discovered={} duration_ms={}",
            versions.len(),
            discovered_count,
            started_at.elapsed().as_millis()
        );
        self.cache.set(VERSIONS_CACHE_KEY, &versions);
        versions
    }

    pub fn find_version(&self, id: &str) -> Option<BibleVersion> {
        self.get_versions()
            .into_iter()
            .find(|version| version.id == id)
    }

    /// Versions listed by the manifest, or else probed translation files.
    pub fn discover_versions(&self) -> Vec<BibleVersion> {
        let config = self.fetcher.config();
        if let Some(location) = config.manifest_location.as_deref() {
            match self.fetcher.read_json(location) {
                Ok(Value::Array(entries)) => {
                    let versions: Vec<BibleVersion> =
                        entries.iter().filter_map(version_from_manifest).collect();
                    info!(
                        "event=versions_discover module=service status=ok strategy=manifest count={}",
                        versions.len()
                    );
                    return versions;
                }
                Ok(_) => debug!(
                    "event=versions_discover module=service status=skip strategy=manifest reason=not_array"
                ),
                Err(err) => debug!(
                    "event=versions_discover module=service status=skip strategy=manifest error_code={}",
                    err.code()
                ),
            }
        }

        let versions: Vec<BibleVersion> = config
            .probe_ids
            .iter()
            .filter_map(|id| match self.fetcher.fetch_translation(id) {
                Ok(_) => Some(discovered_version(id)),
                Err(err) => {
                    debug!(
                        "event=version_probe module=service status=miss bible_id={} error_code={}",
                        id,
                        err.code()
                    );
                    None
                }
            })
            .collect();
        info!(
            "event=versions_discover module=service status=ok strategy=probe probed={} count={}",
            config.probe_ids.len(),
            versions.len()
        );
        versions
    }
}

/// Concatenates both lists and drops later duplicates by `id`.
pub fn merge_versions(
    builtin: Vec<BibleVersion>,
    discovered: Vec<BibleVersion>,
) -> Vec<BibleVersion> {
    let mut seen: HashSet<String> = HashSet::new();
    builtin
        .into_iter()
        .chain(discovered)
        .filter(|version| seen.insert(version.id.clone()))
        .collect()
}

/// Lenient mapping of one manifest entry; non-objects are ignored.
pub fn version_from_manifest(entry: &Value) -> Option<BibleVersion> {
    let fields = entry.as_object()?;
    let id = first_str(fields, &["id", "abbreviation"]).unwrap_or("unknown");
    let name = first_str(fields, &["name", "full_name"]).unwrap_or("Unknown Version");
    let abbreviation = first_str(fields, &["abbreviation", "id"]).unwrap_or("UNK");
    let description = first_str(fields, &["description"])
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "{} translation",
                first_str(fields, &["name"]).unwrap_or("Bible")
            )
        });

    let empty = Map::new();
    let language = fields
        .get("language")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let script_direction = match first_str(language, &["scriptDirection"]) {
        Some(direction) if direction.eq_ignore_ascii_case("rtl") => ScriptDirection::Rtl,
        _ => ScriptDirection::Ltr,
    };

    Some(BibleVersion {
        id: id.to_string(),
        name: name.to_string(),
        name_local: first_str(fields, &["nameLocal", "name"])
            .unwrap_or("Unknown Version")
            .to_string(),
        abbreviation: abbreviation.to_string(),
        abbreviation_local: first_str(fields, &["abbreviationLocal", "abbreviation"])
            .unwrap_or("UNK")
            .to_string(),
        description,
        language: Language::new(
            first_str(language, &["id"]).unwrap_or("en"),
            first_str(language, &["name"]).unwrap_or("English"),
            first_str(language, &["nameLocal"]).unwrap_or("English"),
            first_str(language, &["script"]).unwrap_or("Latin"),
            script_direction,
        ),
        source: SourceTag::GithubData,
    })
}

fn first_str<'v>(fields: &'v Map<String, Value>, keys: &[&str]) -> Option<&'v str> {
    keys.iter().find_map(|key| {
        fields
            .get(*key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_keeps_first_occurrence() {
        let builtin = builtin_versions();
        let builtin_len = builtin.len();
        let merged = merge_versions(
            builtin,
            vec![discovered_version("kjv"), discovered_version("ylt98")],
        );
        assert_eq!(merged.len(), builtin_len + 1);
        let kjv: Vec<_> = merged.iter().filter(|version| version.id == "kjv").collect();
        assert_eq!(kjv.len(), 1);
        assert_eq!(kjv[0].source, SourceTag::Static);
        assert_eq!(merged.last().unwrap().id, "ylt98");
    }

    #[test]
    fn manifest_entries_map_leniently() {
        let version = version_from_manifest(&json!({
            "abbreviation": "WEB",
            "full_name": "World English Bible",
            "language": {"id": "he", "scriptDirection": "rtl"}
        }))
        .unwrap();
        assert_eq!(version.id, "WEB");
        assert_eq!(version.name, "World English Bible");
        assert_eq!(version.name_local, "Unknown Version");
        assert_eq!(version.description, "Bible translation");
        assert_eq!(version.language.id, "he");
        assert_eq!(version.language.name, "English");
        assert_eq!(version.language.script_direction, ScriptDirection::Rtl);
        assert_eq!(version.source, SourceTag::GithubData);

        let bare = version_from_manifest(&json!({})).unwrap();
        assert_eq!(bare.id, "unknown");
        assert_eq!(bare.abbreviation, "UNK");
        assert!(version_from_manifest(&json!("kjv")).is_none());
    }
}
