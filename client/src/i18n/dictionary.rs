//! Translation dictionaries and dotted-path lookup.

#[cfg(test)]
#[path = "dictionary_test.rs"]
mod dictionary_test;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Deserialize;

/// One node of a translation file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Translation {
    Text(String),
    Group(BTreeMap<String, Translation>),
    /// Numbers, arrays and the like. Never rendered.
    Other(serde_json::Value),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Dictionary(BTreeMap<String, Translation>);

static ENGLISH: LazyLock<Dictionary> =
    LazyLock::new(|| serde_json::from_str(include_str!("en.json")).unwrap_or_default());

/// Built-in English strings, used whenever a language file cannot be loaded.
pub fn english() -> &'static Dictionary {
    &ENGLISH
}

impl Dictionary {
    /// Resolve `nav.jobs` style keys. Only string leaves match.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let mut node = self.0.get(segments.next()?)?;
        for segment in segments {
            match node {
                Translation::Group(children) => node = children.get(segment)?,
                _ => return None,
            }
        }
        match node {
            Translation::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
