//! Record schemas, field descriptors, coercion capabilities, and the schema
//! registry.

mod coercion;
mod field;
mod record_schema;
mod registry;

pub use coercion::{format_timestamp, parse_timestamp, Coercion, DecodeScalar, TimestampField};
pub use field::{AssignFn, ClearFn, FieldDescriptor, ProjectFn};
pub use record_schema::{RecordSchema, SchemaBuilder};
pub use registry::SchemaRegistry;

/// A record that changesets can be applied to.
///
/// Implementors declare each field once with its external tag; the schema is
/// built on first use and cached by [`SchemaRegistry`].
///
/// # Example
/// ```
/// use changeset_core::schema::{Patchable, SchemaBuilder};
///
/// #[derive(Default)]
/// struct Station {
///     name: String,
///     elevation: Option<i32>,
/// }
///
/// impl Patchable for Station {
///     const RECORD_NAME: &'static str = "Station";
///
///     fn describe() -> SchemaBuilder<Self> {
///         SchemaBuilder::new()
///             .field("name", "name", |s: &mut Station| &mut s.name)
///             .field("elevationMeters", "elevation", |s: &mut Station| &mut s.elevation)
///     }
/// }
/// ```
pub trait Patchable: Sized + 'static {
    /// Record type name used in errors and logs
    const RECORD_NAME: &'static str;

    /// Declares the record's fields.
    fn describe() -> SchemaBuilder<Self>;
}
