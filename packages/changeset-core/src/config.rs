//! Applier configuration.

use serde::{Deserialize, Serialize};

/// Tag written by the audit-stamping wrapper unless configured otherwise.
pub const DEFAULT_MODIFIER_TAG: &str = "modifiedBy";

/// Changeset applier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Tag that receives the modifier identity in `apply_with_modifier`.
    ///
    /// Must name a field of every record the applier stamps; audited records
    /// declare only [`DEFAULT_MODIFIER_TAG`]. A tag the record lacks fails
    /// with a `Setup` error before anything is written.
    pub modifier_tag: String,
    /// Fail the whole application when a key matches no field
    pub reject_unknown_fields: bool,
    /// Rewrite empty strings and unset sequences to null before applying
    pub normalize_empty_values: bool,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            modifier_tag: DEFAULT_MODIFIER_TAG.to_string(),
            reject_unknown_fields: true,
            normalize_empty_values: true,
        }
    }
}
