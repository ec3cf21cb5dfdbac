//! Field descriptors.

use std::fmt;
use std::sync::Arc;

use super::coercion::Coercion;
use crate::error::CoercionFailure;
use crate::value::ChangeValue;

/// Type alias for the coerce-and-write function of a field.
pub type AssignFn<R> = dyn Fn(&mut R, &ChangeValue) -> Result<(), CoercionFailure> + Send + Sync;

/// Type alias for the reset-to-default function of a field.
pub type ClearFn<R> = dyn Fn(&mut R) + Send + Sync;

/// Type alias for a projection from a record to one of its parts.
pub type ProjectFn<R, T> = dyn Fn(&mut R) -> &mut T + Send + Sync;

/// Field of record type `R`, addressable by its tag.
pub struct FieldDescriptor<R> {
    /// External (wire) name
    tag: String,
    /// Internal name; dotted path for fields of embedded records
    name: String,
    /// Destination Rust type
    type_name: &'static str,
    /// Rule used to convert changeset values
    coercion: Coercion,
    assign: Arc<AssignFn<R>>,
    clear: Arc<ClearFn<R>>,
}

impl<R: 'static> FieldDescriptor<R> {
    /// Creates a descriptor for the field reached through `project`.
    ///
    /// # Arguments
    /// * `tag` - External field name
    /// * `name` - Internal field name
    /// * `coercion` - Rule implemented by `coerce`
    /// * `project` - Accessor from the record to the field
    /// * `coerce` - Conversion from a non-null changeset value
    pub(crate) fn new<T, F, C>(
        tag: &str,
        name: &str,
        coercion: Coercion,
        project: F,
        coerce: C,
    ) -> Self
    where
        T: Default + 'static,
        F: Fn(&mut R) -> &mut T + Send + Sync + 'static,
        C: Fn(&ChangeValue) -> Result<T, CoercionFailure> + Send + Sync + 'static,
    {
        let project = Arc::new(project);
        let assign_project = Arc::clone(&project);

        Self {
            tag: tag.to_string(),
            name: name.to_string(),
            type_name: std::any::type_name::<T>(),
            coercion,
            assign: Arc::new(
                move |record: &mut R, value: &ChangeValue| -> Result<(), CoercionFailure> {
                    let coerced = coerce(value)?;
                    *assign_project(record) = coerced;
                    Ok(())
                },
            ),
            clear: Arc::new(move |record: &mut R| {
                *project(record) = T::default();
            }),
        }
    }

    /// Re-targets this descriptor at an outer record embedding `R`.
    ///
    /// The tag is unchanged so the field stays addressable directly on the
    /// outer record.
    pub(crate) fn embedded_in<O: 'static>(
        self,
        prefix: &str,
        project: Arc<ProjectFn<O, R>>,
    ) -> FieldDescriptor<O> {
        let inner_assign = self.assign;
        let inner_clear = self.clear;
        let assign_project = Arc::clone(&project);

        FieldDescriptor {
            tag: self.tag,
            name: format!("{}.{}", prefix, self.name),
            type_name: self.type_name,
            coercion: self.coercion,
            assign: Arc::new(move |outer: &mut O, value: &ChangeValue| {
                inner_assign(assign_project(outer), value)
            }),
            clear: Arc::new(move |outer: &mut O| inner_clear(project(outer))),
        }
    }
}

impl<R> FieldDescriptor<R> {
    /// Returns the external field name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the internal field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the destination type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the coercion rule.
    pub fn coercion(&self) -> Coercion {
        self.coercion
    }

    /// Writes `value` into the field of `record`.
    ///
    /// Null resets the field to its default without running the coercion rule.
    pub fn assign(&self, record: &mut R, value: &ChangeValue) -> Result<(), CoercionFailure> {
        if value.is_null() {
            (self.clear)(record);
            Ok(())
        } else {
            (self.assign)(record, value)
        }
    }

    /// Resets the field of `record` to its default value.
    pub fn clear(&self, record: &mut R) {
        (self.clear)(record);
    }
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            name: self.name.clone(),
            type_name: self.type_name,
            coercion: self.coercion,
            assign: Arc::clone(&self.assign),
            clear: Arc::clone(&self.clear),
        }
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("coercion", &self.coercion)
            .finish_non_exhaustive()
    }
}
