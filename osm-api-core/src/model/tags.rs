//! The key/value tag bag shared by every entity.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Tags attached to an element or changeset.
///
/// Keys are unique. Iteration follows the order in which keys first
/// appeared in the source document; re-inserting a key replaces its value
/// but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(IndexMap<String, String>);

impl Tags {
    /// Create an empty tag bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up a tag value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Check if a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// # Panics
///
/// Panics if the key is not present, like indexing a `HashMap`.
impl Index<&str> for Tags {
    type Output = str;

    fn index(&self, key: &str) -> &str {
        match self.0.get(key) {
            Some(value) => value,
            None => panic!("no tag with key '{key}'"),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Self::new();
        for (key, value) in iter {
            tags.insert(key, value);
        }
        tags
    }
}

impl IntoIterator for Tags {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
