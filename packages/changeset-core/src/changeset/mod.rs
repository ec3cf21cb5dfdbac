//! Changeset mapping and normalization.

mod normalize;

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{ChangesetError, Result};
use crate::value::ChangeValue;

pub use normalize::normalize_entries;

/// Sparse mapping of field tag to new value.
///
/// A present key means "set this field"; an absent key leaves the field
/// untouched. Iteration is in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changeset {
    entries: BTreeMap<String, ChangeValue>,
}

impl Changeset {
    /// Creates an empty changeset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a changeset from a decoded JSON object.
    ///
    /// # Returns
    /// `Err(ChangesetError::InvalidChangeset)` if `value` is not an object.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(entries) => Ok(entries.into_iter().collect()),
            other => Err(ChangesetError::InvalidChangeset(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parses a changeset from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| ChangesetError::InvalidChangeset(e.to_string()))?;
        Self::from_json(value)
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ChangeValue>,
    ) -> Option<ChangeValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&ChangeValue> {
        self.entries.get(key)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ChangeValue> {
        self.entries.remove(key)
    }

    /// Checks whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the changeset has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over entries in sorted key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ChangeValue> {
        self.entries.iter()
    }

    /// Merges `other` into this changeset; entries from `other` win.
    pub fn merge(&mut self, other: Changeset) {
        self.entries.extend(other.entries);
    }

    /// Rewrites empty strings and unset sequences to null in place.
    ///
    /// # Returns
    /// Number of entries rewritten.
    pub fn normalize(&mut self) -> usize {
        normalize_entries(&mut self.entries)
    }
}

impl<K, V> FromIterator<(K, V)> for Changeset
where
    K: Into<String>,
    V: Into<ChangeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Changeset {
    type Item = (String, ChangeValue);
    type IntoIter = btree_map::IntoIter<String, ChangeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Changeset {
    type Item = (&'a String, &'a ChangeValue);
    type IntoIter = btree_map::Iter<'a, String, ChangeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
