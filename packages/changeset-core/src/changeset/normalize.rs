//! Normalization of ambiguous empty values.

use std::collections::BTreeMap;

use crate::value::ChangeValue;

/// Rewrites empty values into the explicit null marker.
///
/// - zero-length strings become [`ChangeValue::Null`]
/// - unset sequences (`Sequence(None)`) become [`ChangeValue::Null`]
///
/// Present-but-empty sequences and nested values are left alone.
///
/// # Returns
/// Number of entries rewritten.
pub fn normalize_entries(entries: &mut BTreeMap<String, ChangeValue>) -> usize {
    let mut rewritten = 0;

    for (key, value) in entries.iter_mut() {
        if is_ambiguous_empty(value) {
            tracing::trace!("Normalizing empty {} for '{}' to null", value.kind(), key);
            *value = ChangeValue::Null;
            rewritten += 1;
        }
    }

    rewritten
}

fn is_ambiguous_empty(value: &ChangeValue) -> bool {
    match value {
        ChangeValue::String(s) => s.is_empty(),
        ChangeValue::Sequence(None) => true,
        _ => false,
    }
}
