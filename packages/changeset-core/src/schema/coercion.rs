//! Coercion rules and destination-type capabilities.
//!
//! The rule for a field is fixed when its descriptor is declared, in this
//! order of precedence:
//! 1. timestamp fields parse RFC 3339 strings
//! 2. types implementing [`DecodeScalar`] decode themselves
//! 3. everything else is deserialized directly with serde
//!
//! A null value never reaches these rules; it resets the field to its default.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Number, Value as JsonValue};
use uuid::Uuid;

use crate::error::CoercionFailure;
use crate::value::ChangeValue;

/// Coercion rule bound to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercion {
    /// RFC 3339 string to timestamp
    Timestamp,
    /// Type-specific [`DecodeScalar`] routine
    Scalar,
    /// Direct structural assignment
    Direct,
}

impl Coercion {
    /// Returns the rule name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Coercion::Timestamp => "timestamp",
            Coercion::Scalar => "scalar",
            Coercion::Direct => "direct",
        }
    }
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability for types that parse themselves from a scalar changeset value.
///
/// Register such fields with [`SchemaBuilder::scalar`](super::SchemaBuilder::scalar).
pub trait DecodeScalar: Sized {
    /// Decodes a non-null changeset value.
    fn decode_scalar(value: &ChangeValue) -> Result<Self, CoercionFailure>;
}

impl DecodeScalar for Uuid {
    fn decode_scalar(value: &ChangeValue) -> Result<Self, CoercionFailure> {
        let text = value.as_str().ok_or_else(|| {
            CoercionFailure::new(format!("expected a UUID string, got {}", value.kind()))
        })?;
        Uuid::parse_str(text).map_err(|e| CoercionFailure::new(format!("invalid UUID: {}", e)))
    }
}

impl<T: DecodeScalar> DecodeScalar for Option<T> {
    fn decode_scalar(value: &ChangeValue) -> Result<Self, CoercionFailure> {
        T::decode_scalar(value).map(Some)
    }
}

/// Field types that hold a UTC timestamp.
pub trait TimestampField: Default {
    /// Wraps a parsed timestamp in the field type.
    fn from_timestamp(timestamp: DateTime<Utc>) -> Self;
}

impl TimestampField for DateTime<Utc> {
    fn from_timestamp(timestamp: DateTime<Utc>) -> Self {
        timestamp
    }
}

impl TimestampField for Option<DateTime<Utc>> {
    fn from_timestamp(timestamp: DateTime<Utc>) -> Self {
        Some(timestamp)
    }
}

/// Parses an RFC 3339 timestamp with optional fractional seconds.
///
/// Date and time must be separated by `T` (or `t`); the space separator
/// chrono otherwise tolerates is rejected.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, CoercionFailure> {
    if !matches!(text.as_bytes().get(10), Some(b'T' | b't')) {
        return Err(CoercionFailure::new(format!(
            "invalid RFC 3339 timestamp: expected 'T' between date and time in '{}'",
            text
        )));
    }
    DateTime::parse_from_rfc3339(text)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| CoercionFailure::new(format!("invalid RFC 3339 timestamp: {}", e)))
}

/// Formats a timestamp as RFC 3339 in UTC (`Z` suffix).
///
/// Sub-second digits use the shortest of milli-, micro- or nanosecond
/// precision that represents the instant exactly.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn coerce_timestamp<T: TimestampField>(
    value: &ChangeValue,
) -> Result<T, CoercionFailure> {
    match value {
        ChangeValue::String(text) => parse_timestamp(text).map(T::from_timestamp),
        other => Err(CoercionFailure::new(format!(
            "expected an RFC 3339 timestamp string, got {}",
            other.kind()
        ))),
    }
}

pub(crate) fn coerce_scalar<T: DecodeScalar>(value: &ChangeValue) -> Result<T, CoercionFailure> {
    T::decode_scalar(value)
}

pub(crate) fn coerce_direct<T: DeserializeOwned>(
    value: &ChangeValue,
) -> Result<T, CoercionFailure> {
    serde_json::from_value(integral_floats_to_ints(value.to_json())).map_err(|e| {
        CoercionFailure::new(format!(
            "{} is not assignable to {}: {}",
            value.kind(),
            std::any::type_name::<T>(),
            e
        ))
    })
}

/// Rewrites floats with no fractional part as integers, recursively.
///
/// Decoded JSON may carry `7.0` for a whole number; integer fields accept it
/// while `2.5` and values outside the `i64`/`u64` range stay floats.
fn integral_floats_to_ints(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Number(n) => JsonValue::Number(match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 => whole_number(f).unwrap_or(n),
            _ => n,
        }),
        JsonValue::Array(items) => {
            JsonValue::Array(items.into_iter().map(integral_floats_to_ints).collect())
        }
        JsonValue::Object(entries) => JsonValue::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key, integral_floats_to_ints(value)))
                .collect(),
        ),
        other => other,
    }
}

fn whole_number(f: f64) -> Option<Number> {
    if f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Number::from(f as i64))
    } else if f >= 0.0 && f < u64::MAX as f64 {
        Some(Number::from(f as u64))
    } else {
        None
    }
}
