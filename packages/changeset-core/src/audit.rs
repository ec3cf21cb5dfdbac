//! Audit fields and modifier stamping.
//!
//! Records embedding [`AuditFields`] expose `id`, `createdBy`, `createdDts`,
//! `modifiedBy` and `modifiedDts` as their own tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::apply::Applier;
use crate::changeset::Changeset;
use crate::config::DEFAULT_MODIFIER_TAG;
use crate::error::Result;
use crate::schema::{format_timestamp, Patchable, SchemaBuilder};
use crate::value::ChangeValue;

/// Creation and modification bookkeeping shared by audited records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFields {
    pub id: Uuid,
    pub created_by: String,
    #[serde(rename = "createdDts")]
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    #[serde(rename = "modifiedDts")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl AuditFields {
    /// Creates audit fields for a record created now by `created_by`.
    pub fn new(created_by: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_by: created_by.into(),
            created_at: Utc::now(),
            modified_by: None,
            modified_at: None,
        }
    }

    /// Returns the last modifier, falling back to the creator.
    pub fn last_modifier(&self) -> &str {
        self.modified_by.as_deref().unwrap_or(&self.created_by)
    }

    /// Returns the creation time formatted as RFC 3339.
    pub fn created_dts(&self) -> String {
        format_timestamp(&self.created_at)
    }
}

impl Patchable for AuditFields {
    const RECORD_NAME: &'static str = "AuditFields";

    fn describe() -> SchemaBuilder<Self> {
        SchemaBuilder::new()
            .scalar("id", "id", |a: &mut AuditFields| &mut a.id)
            .field("createdBy", "created_by", |a: &mut AuditFields| {
                &mut a.created_by
            })
            .timestamp("createdDts", "created_at", |a: &mut AuditFields| {
                &mut a.created_at
            })
            .field(DEFAULT_MODIFIER_TAG, "modified_by", |a: &mut AuditFields| {
                &mut a.modified_by
            })
            .timestamp("modifiedDts", "modified_at", |a: &mut AuditFields| {
                &mut a.modified_at
            })
    }
}

/// Writes `modifier` into `changes` under `tag`.
///
/// # Returns
/// The entry previously stored under `tag`, if any.
pub fn stamp_modifier(changes: &mut Changeset, tag: &str, modifier: &str) -> Option<ChangeValue> {
    let previous = changes.insert(tag, modifier);
    if let Some(previous) = &previous {
        tracing::debug!("Overwriting {} value {} with {}", tag, previous, modifier);
    }
    previous
}

/// Records `modifier` as the last modifier and applies `changes` to `target`.
///
/// Uses the default configuration. The modifier is stamped into `changes`
/// before application, so a caller-supplied `modifiedBy` entry is replaced.
pub fn apply_changes_with_modifier<R: Patchable>(
    changes: &mut Changeset,
    modifier: &str,
    target: &mut R,
) -> Result<()> {
    Applier::default().apply_with_modifier(changes, modifier, target)
}
