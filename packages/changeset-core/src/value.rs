//! Dynamically-typed changeset values.
//!
//! A changeset value is one of a small closed set of kinds. The kind is fixed
//! when the value is constructed (usually while decoding a JSON request body),
//! so the normalizer and the coercion rules match on the enum instead of
//! probing runtime types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value as JsonValue};

/// A single changeset value.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeValue {
    /// Explicit "clear this field" marker
    Null,
    /// Boolean
    Bool(bool),
    /// Integer or floating point number
    Number(Number),
    /// Text
    String(String),
    /// Sequence of values.
    ///
    /// `None` is an unset sequence, distinct from a present-but-empty
    /// `Some(vec![])`. Only the former is normalized to [`ChangeValue::Null`].
    Sequence(Option<Vec<ChangeValue>>),
    /// Nested map of values
    Map(BTreeMap<String, ChangeValue>),
}

impl ChangeValue {
    /// Returns an unset sequence value.
    pub fn unset_sequence() -> Self {
        ChangeValue::Sequence(None)
    }

    /// Returns a present sequence with no elements.
    pub fn empty_sequence() -> Self {
        ChangeValue::Sequence(Some(Vec::new()))
    }

    /// Returns the name of this value's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeValue::Null => "null",
            ChangeValue::Bool(_) => "bool",
            ChangeValue::Number(_) => "number",
            ChangeValue::String(_) => "string",
            ChangeValue::Sequence(_) => "sequence",
            ChangeValue::Map(_) => "map",
        }
    }

    /// Returns `true` for the explicit null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, ChangeValue::Null)
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ChangeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a numeric value.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            ChangeValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Converts to a JSON value.
    ///
    /// An unset sequence becomes JSON `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            ChangeValue::Null | ChangeValue::Sequence(None) => JsonValue::Null,
            ChangeValue::Bool(b) => JsonValue::Bool(*b),
            ChangeValue::Number(n) => JsonValue::Number(n.clone()),
            ChangeValue::String(s) => JsonValue::String(s.clone()),
            ChangeValue::Sequence(Some(items)) => {
                JsonValue::Array(items.iter().map(ChangeValue::to_json).collect())
            }
            ChangeValue::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for ChangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<JsonValue> for ChangeValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => ChangeValue::Null,
            JsonValue::Bool(b) => ChangeValue::Bool(b),
            JsonValue::Number(n) => ChangeValue::Number(n),
            JsonValue::String(s) => ChangeValue::String(s),
            JsonValue::Array(items) => {
                ChangeValue::Sequence(Some(items.into_iter().map(ChangeValue::from).collect()))
            }
            JsonValue::Object(entries) => ChangeValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, ChangeValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ChangeValue {
    fn from(value: &str) -> Self {
        ChangeValue::String(value.to_string())
    }
}

impl From<String> for ChangeValue {
    fn from(value: String) -> Self {
        ChangeValue::String(value)
    }
}

impl From<bool> for ChangeValue {
    fn from(value: bool) -> Self {
        ChangeValue::Bool(value)
    }
}

impl From<i32> for ChangeValue {
    fn from(value: i32) -> Self {
        ChangeValue::Number(value.into())
    }
}

impl From<i64> for ChangeValue {
    fn from(value: i64) -> Self {
        ChangeValue::Number(value.into())
    }
}

impl From<u64> for ChangeValue {
    fn from(value: u64) -> Self {
        ChangeValue::Number(value.into())
    }
}

/// Non-finite floats have no JSON representation and become [`ChangeValue::Null`].
impl From<f64> for ChangeValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(ChangeValue::Null, ChangeValue::Number)
    }
}

impl<T: Into<ChangeValue>> From<Vec<T>> for ChangeValue {
    fn from(items: Vec<T>) -> Self {
        ChangeValue::Sequence(Some(items.into_iter().map(Into::into).collect()))
    }
}

impl<T: Into<ChangeValue>> From<Option<T>> for ChangeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ChangeValue::Null, Into::into)
    }
}

impl From<BTreeMap<String, ChangeValue>> for ChangeValue {
    fn from(entries: BTreeMap<String, ChangeValue>) -> Self {
        ChangeValue::Map(entries)
    }
}

impl Serialize for ChangeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ChangeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(ChangeValue::from)
    }
}
