//! Translation descriptors.

use serde::{Deserialize, Serialize};

/// Provenance of a translation; selects the retrieval strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTag {
    /// Built-in catalog entry without a dedicated source.
    Static,
    /// Reserved for hosted scripture APIs.
    ApiBible,
    /// unfoldingWord USFM repositories.
    GithubUnfolding,
    /// STEP Bible plain-text endpoint.
    GithubStep,
    /// Listed by a remote `versions.json` manifest.
    GithubData,
    /// Discovered by probing local translation files.
    LocalJson,
}

impl SourceTag {
    /// Whether books and chapters may be derived from the translation document.
    pub fn is_discoverable(self) -> bool {
        matches!(self, Self::GithubData | Self::LocalJson)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::ApiBible => "api-bible",
            Self::GithubUnfolding => "github-unfolding",
            Self::GithubStep => "github-step",
            Self::GithubData => "github-data",
            Self::LocalJson => "local-json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Language metadata attached to a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: String,
    pub name: String,
    pub name_local: String,
    pub script: String,
    pub script_direction: ScriptDirection,
}

impl Language {
    pub fn new(
        id: &str,
        name: &str,
        name_local: &str,
        script: &str,
        script_direction: ScriptDirection,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            name_local: name_local.to_string(),
            script: script.to_string(),
            script_direction,
        }
    }

    /// English in Latin script, the default for sources without metadata.
    pub fn english() -> Self {
        Self::new("en", "English", "English", "Latin", ScriptDirection::Ltr)
    }
}

/// One available translation.
///
/// Built once when the catalog is assembled and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleVersion {
    pub id: String,
    pub name: String,
    pub name_local: String,
    pub abbreviation: String,
    pub abbreviation_local: String,
    pub description: String,
    pub language: Language,
    pub source: SourceTag,
}

#[cfg(test)]
mod tests {
    use super::{BibleVersion, Language, ScriptDirection, SourceTag};

    #[test]
    fn source_tag_serializes_as_kebab_case() {
        let encoded = serde_json::to_string(&SourceTag::GithubUnfolding).unwrap();
        assert_eq!(encoded, "\"github-unfolding\"");
        let decoded: SourceTag = serde_json::from_str("\"local-json\"").unwrap();
        assert_eq!(decoded, SourceTag::LocalJson);
        assert_eq!(SourceTag::ApiBible.as_str(), "api-bible");
    }

    #[test]
    fn only_data_backed_tags_are_discoverable() {
        assert!(SourceTag::GithubData.is_discoverable());
        assert!(SourceTag::LocalJson.is_discoverable());
        assert!(!SourceTag::Static.is_discoverable());
        assert!(!SourceTag::GithubStep.is_discoverable());
    }

    #[test]
    fn version_uses_camel_case_field_names() {
        let version = BibleVersion {
            id: "kjv".to_string(),
            name: "King James Version".to_string(),
            name_local: "King James Version".to_string(),
            abbreviation: "KJV".to_string(),
            abbreviation_local: "KJV".to_string(),
            description: "classic".to_string(),
            language: Language::new("he", "Hebrew", "עברית", "Hebrew", ScriptDirection::Rtl),
            source: SourceTag::Static,
        };
        let value = serde_json::to_value(&version).unwrap();
        assert_eq!(value["nameLocal"], "King James Version");
        assert_eq!(value["language"]["scriptDirection"], "rtl");
        assert_eq!(value["source"], "static");
    }
}
