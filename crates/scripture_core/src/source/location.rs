//! Source location templates and identifier casing candidates.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Path or URL template resolved against one request.
///
/// Placeholders: `{id}` translation identifier, `{book}` lowercase book key,
/// `{BOOK}` uppercase book key, `{chapter}` chapter number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationTemplate(String);

impl LocationTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the template varies with the translation identifier.
    pub fn uses_identifier(&self) -> bool {
        self.0.contains("{id}")
    }

    /// Whether rendered locations are full `http(s)://` URLs.
    pub fn is_absolute_url(&self) -> bool {
        crate::source::reader::is_absolute_url(&self.0)
    }

    pub fn render(&self, id: &str, book: Option<&str>, chapter: Option<&str>) -> String {
        let mut location = self.0.replace("{id}", id);
        if let Some(book) = book {
            location = location
                .replace("{book}", &book.to_lowercase())
                .replace("{BOOK}", &book.to_uppercase());
        }
        if let Some(chapter) = chapter {
            location = location.replace("{chapter}", chapter);
        }
        location
    }
}

impl Display for LocationTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationTemplate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One spelling of a translation identifier tried against a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierCasing {
    Lower,
    Upper,
    AsGiven,
}

impl IdentifierCasing {
    /// Candidate order used when nothing else is configured.
    pub const DEFAULT_ORDER: [IdentifierCasing; 3] = [Self::Lower, Self::Upper, Self::AsGiven];

    pub fn apply(self, id: &str) -> String {
        match self {
            Self::Lower => id.to_lowercase(),
            Self::Upper => id.to_uppercase(),
            Self::AsGiven => id.to_string(),
        }
    }
}

/// Identifier spellings in casing order, duplicates removed.
pub fn identifier_candidates(id: &str, casings: &[IdentifierCasing]) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(casings.len());
    for casing in casings {
        let candidate = casing.apply(id.trim());
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// Chapter keys tried against a source: the key as given, then without
/// leading zeros.
pub fn chapter_key_candidates(chapter: &str) -> Vec<String> {
    let given = chapter.trim().to_string();
    let mut candidates = vec![given.clone()];
    let trimmed = given.trim_start_matches('0');
    if !trimmed.is_empty() && trimmed != given {
        candidates.push(trimmed.to_string());
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_renders_placeholders() {
        let template = LocationTemplate::new("{id}/{book}/{BOOK}.{chapter}.json");
        assert_eq!(
            template.render("kjv", Some("Gen"), Some("3")),
            "kjv/gen/GEN.3.json"
        );
        assert_eq!(template.render("kjv", None, None), "kjv/{book}/{BOOK}.{chapter}.json");
        assert!(template.uses_identifier());
    }

    #[test]
    fn identifier_candidates_dedupe_casings() {
        assert_eq!(
            identifier_candidates("kjv", &IdentifierCasing::DEFAULT_ORDER),
            vec!["kjv", "KJV"]
        );
        assert_eq!(
            identifier_candidates("NvI-pt", &IdentifierCasing::DEFAULT_ORDER),
            vec!["nvi-pt", "NVI-PT", "NvI-pt"]
        );
    }

    #[test]
    fn chapter_candidates_strip_leading_zeros() {
        assert_eq!(chapter_key_candidates("01"), vec!["01", "1"]);
        assert_eq!(chapter_key_candidates("1"), vec!["1"]);
        assert_eq!(chapter_key_candidates("0"), vec!["0"]);
    }

    #[test]
    fn casing_serializes_as_kebab_case() {
        let encoded = serde_json::to_string(&IdentifierCasing::AsGiven).unwrap();
        assert_eq!(encoded, "\"as-given\"");
    }
}
