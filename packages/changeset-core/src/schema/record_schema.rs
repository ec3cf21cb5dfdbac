//! Record schemas and their builder.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::coercion::{self, Coercion, DecodeScalar, TimestampField};
use super::field::{FieldDescriptor, ProjectFn};
use super::Patchable;
use crate::error::{ChangesetError, Result};

/// Builder for a [`RecordSchema`].
///
/// Each declaration binds a tag to an accessor and picks the coercion rule
/// for the field, so no capability probing happens per call.
pub struct SchemaBuilder<R> {
    record: &'static str,
    fields: Vec<FieldDescriptor<R>>,
}

impl<R: Patchable> SchemaBuilder<R> {
    /// Creates an empty builder for `R`.
    pub fn new() -> Self {
        Self {
            record: R::RECORD_NAME,
            fields: Vec::new(),
        }
    }

    /// Declares a field assigned directly from structurally compatible values.
    pub fn field<T, F>(mut self, tag: &str, name: &str, project: F) -> Self
    where
        T: DeserializeOwned + Default + 'static,
        F: Fn(&mut R) -> &mut T + Send + Sync + 'static,
    {
        self.fields.push(FieldDescriptor::new(
            tag,
            name,
            Coercion::Direct,
            project,
            coercion::coerce_direct::<T>,
        ));
        self
    }

    /// Declares a timestamp field parsed from RFC 3339 strings.
    pub fn timestamp<T, F>(mut self, tag: &str, name: &str, project: F) -> Self
    where
        T: TimestampField + 'static,
        F: Fn(&mut R) -> &mut T + Send + Sync + 'static,
    {
        self.fields.push(FieldDescriptor::new(
            tag,
            name,
            Coercion::Timestamp,
            project,
            coercion::coerce_timestamp::<T>,
        ));
        self
    }

    /// Declares a field whose type decodes itself through [`DecodeScalar`].
    pub fn scalar<T, F>(mut self, tag: &str, name: &str, project: F) -> Self
    where
        T: DecodeScalar + Default + 'static,
        F: Fn(&mut R) -> &mut T + Send + Sync + 'static,
    {
        self.fields.push(FieldDescriptor::new(
            tag,
            name,
            Coercion::Scalar,
            project,
            coercion::coerce_scalar::<T>,
        ));
        self
    }

    /// Flattens the fields of an embedded record into this schema.
    ///
    /// The embedded fields keep their own tags; `name` only prefixes their
    /// internal names.
    pub fn embed<S, F>(mut self, name: &str, project: F) -> Self
    where
        S: Patchable,
        F: Fn(&mut R) -> &mut S + Send + Sync + 'static,
    {
        let project: Arc<ProjectFn<R, S>> = Arc::new(project);
        for field in S::describe().fields {
            self.fields
                .push(field.embedded_in(name, Arc::clone(&project)));
        }
        self
    }

    /// Validates tags and builds the schema.
    ///
    /// # Returns
    /// `Err(ChangesetError::Setup)` if a tag is empty or declared twice.
    pub fn build(self) -> Result<RecordSchema<R>> {
        let mut by_tag = HashMap::with_capacity(self.fields.len());

        for (index, field) in self.fields.iter().enumerate() {
            if field.tag().is_empty() {
                return Err(ChangesetError::Setup {
                    record: self.record.to_string(),
                    message: format!("field '{}' has an empty tag", field.name()),
                });
            }

            if let Some(previous) = by_tag.insert(field.tag().to_string(), index) {
                return Err(ChangesetError::Setup {
                    record: self.record.to_string(),
                    message: format!(
                        "tag '{}' is declared by both '{}' and '{}'",
                        field.tag(),
                        self.fields[previous].name(),
                        field.name()
                    ),
                });
            }
        }

        Ok(RecordSchema {
            record: self.record,
            fields: self.fields,
            by_tag,
        })
    }
}

impl<R: Patchable> Default for SchemaBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tag-addressable field layout of record type `R`.
///
/// Built once per type and cached by [`SchemaRegistry`](super::SchemaRegistry).
#[derive(Debug)]
pub struct RecordSchema<R> {
    record: &'static str,
    /// Descriptors in declaration order, embedded fields flattened in place
    fields: Vec<FieldDescriptor<R>>,
    by_tag: HashMap<String, usize>,
}

impl<R> RecordSchema<R> {
    /// Returns the record type name.
    pub fn record_name(&self) -> &'static str {
        self.record
    }

    /// Looks up a field by tag.
    pub fn field(&self, tag: &str) -> Option<&FieldDescriptor<R>> {
        self.by_tag.get(tag).map(|&index| &self.fields[index])
    }

    /// Checks whether `tag` names a field.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Returns all field descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    /// Iterates over tags in declaration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDescriptor::tag)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
