//! Changeset application onto typed records.
//!
//! Application runs in three steps:
//! 1. normalize empty values to null (unless disabled)
//! 2. resolve every key against the record schema; unknown keys fail the
//!    whole call before anything is written
//! 3. coerce and write each resolved value in key order

use std::sync::Arc;

use crate::audit;
use crate::changeset::Changeset;
use crate::config::ApplyConfig;
use crate::error::{ChangesetError, Result};
use crate::schema::{FieldDescriptor, Patchable, RecordSchema, SchemaRegistry};
use crate::value::ChangeValue;

/// Applies changesets to records using cached schemas.
#[derive(Debug, Clone)]
pub struct Applier {
    registry: Arc<SchemaRegistry>,
    config: ApplyConfig,
}

impl Applier {
    /// Creates an applier backed by the global schema registry.
    pub fn new(config: ApplyConfig) -> Self {
        Self::with_registry(SchemaRegistry::global(), config)
    }

    /// Creates an applier backed by `registry`.
    pub fn with_registry(registry: Arc<SchemaRegistry>, config: ApplyConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the applier configuration.
    pub fn config(&self) -> &ApplyConfig {
        &self.config
    }

    /// Returns the schema registry.
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Applies `changes` to `target` in place.
    ///
    /// Only fields named in `changes` are written. `changes` is normalized in
    /// place first.
    ///
    /// # Errors
    /// - `UnknownField` if any key has no field; `target` is untouched
    /// - `Coercion` if a value does not fit its field; fields earlier in key
    ///   order may already have been written
    /// - `Setup` if the schema for `R` is invalid
    pub fn apply<R: Patchable>(&self, changes: &mut Changeset, target: &mut R) -> Result<()> {
        if self.config.normalize_empty_values {
            changes.normalize();
        }

        let schema = self.registry.resolve::<R>()?;
        let resolved = self.resolve_fields(&*schema, changes)?;

        for (field, value) in &resolved {
            field
                .assign(target, value)
                .map_err(|failure| ChangesetError::Coercion {
                    field: field.tag().to_string(),
                    value: value.to_string(),
                    reason: failure.to_string(),
                })?;
            tracing::debug!(
                "Set {}.{} from {} value",
                R::RECORD_NAME,
                field.name(),
                value.kind()
            );
        }

        tracing::debug!("Applied {} field(s) to {}", resolved.len(), R::RECORD_NAME);
        Ok(())
    }

    /// Stamps the modifier identity into `changes`, then applies them.
    ///
    /// The modifier is written under [`ApplyConfig::modifier_tag`],
    /// overwriting any existing entry. No modification timestamp is set.
    ///
    /// # Errors
    /// `Setup` if `R` has no field tagged with the configured modifier tag;
    /// `changes` and `target` are left untouched. Otherwise as [`Self::apply`].
    pub fn apply_with_modifier<R: Patchable>(
        &self,
        changes: &mut Changeset,
        modifier: &str,
        target: &mut R,
    ) -> Result<()> {
        let schema = self.registry.resolve::<R>()?;
        if !schema.contains_tag(&self.config.modifier_tag) {
            return Err(ChangesetError::Setup {
                record: R::RECORD_NAME.to_string(),
                message: format!(
                    "modifier tag '{}' does not name a field",
                    self.config.modifier_tag
                ),
            });
        }

        audit::stamp_modifier(changes, &self.config.modifier_tag, modifier);
        self.apply(changes, target)
    }

    /// Applies `changes` to a copy of `target` and swaps it in on success.
    ///
    /// On error `target` is left exactly as it was.
    pub fn apply_atomic<R: Patchable + Clone>(
        &self,
        changes: &mut Changeset,
        target: &mut R,
    ) -> Result<()> {
        let mut scratch = target.clone();
        self.apply(changes, &mut scratch)?;
        *target = scratch;
        Ok(())
    }

    fn resolve_fields<'a, R>(
        &self,
        schema: &'a RecordSchema<R>,
        changes: &'a Changeset,
    ) -> Result<Vec<(&'a FieldDescriptor<R>, &'a ChangeValue)>> {
        let mut resolved = Vec::with_capacity(changes.len());
        let mut unknown = Vec::new();

        for (tag, value) in changes {
            match schema.field(tag) {
                Some(field) => resolved.push((field, value)),
                None => unknown.push(tag.clone()),
            }
        }

        if !unknown.is_empty() {
            if self.config.reject_unknown_fields {
                tracing::warn!(
                    "Rejecting changeset for {}: unknown field(s) {}",
                    schema.record_name(),
                    unknown.join(", ")
                );
                return Err(ChangesetError::UnknownField {
                    record: schema.record_name().to_string(),
                    fields: unknown,
                });
            }
            tracing::warn!(
                "Ignoring unknown field(s) for {}: {}",
                schema.record_name(),
                unknown.join(", ")
            );
        }

        Ok(resolved)
    }
}

impl Default for Applier {
    fn default() -> Self {
        Self::new(ApplyConfig::default())
    }
}

/// Applies `changes` to `target` with the default configuration.
///
/// See [`Applier::apply`].
pub fn apply_changes<R: Patchable>(changes: &mut Changeset, target: &mut R) -> Result<()> {
    Applier::default().apply(changes, target)
}
