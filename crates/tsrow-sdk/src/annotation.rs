//! Field annotation parser.
//!
//! Annotations are the strings carried by `#[tsrow("...")]` field attributes:
//! semicolon-separated tokens, either bare keywords (`tag`, `field`,
//! `timestamp`, `-`) or `key:value` pairs (`column:`, `type:`, `precision:`).

use std::collections::HashMap;

use crate::types::SemanticType;

const IGNORE: &str = "-";

/// Parsed annotation. Keys are stored upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    entries: HashMap<String, String>,
}

impl Annotation {
    /// Parse an annotation string. Never fails; unknown keys are kept but
    /// have no effect.
    ///
    /// Keys are case-insensitive and trimmed. A value is everything after the
    /// first `:`, trimmed, so `column:a:b` names the column `a:b`. A bare
    /// keyword maps to itself.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut entries = HashMap::new();
        for token in raw.split(';') {
            let (key, value) = match token.split_once(':') {
                Some((k, v)) => (k.trim().to_ascii_uppercase(), Some(v.trim())),
                None => (token.trim().to_ascii_uppercase(), None),
            };
            if key.is_empty() {
                continue;
            }
            let value = value.map_or_else(|| key.clone(), str::to_string);
            entries.insert(key, value);
        }
        Self { entries }
    }

    /// `true` when the annotation is exactly the ignore marker `-`.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.entries.len() == 1 && self.entries.contains_key(IGNORE)
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_uppercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Column name override.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.get("column")
    }

    /// Type name override, resolved through the type catalog.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.get("type")
    }

    /// Precision hint for a bare `timestamp` type.
    #[must_use]
    pub fn precision(&self) -> Option<&str> {
        self.get("precision")
    }

    /// `Tag` wins over `Timestamp`; anything else is a field.
    #[must_use]
    pub fn semantic_type(&self) -> SemanticType {
        if self.has("tag") {
            SemanticType::Tag
        } else if self.has("timestamp") {
            SemanticType::Timestamp
        } else {
            SemanticType::Field
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
