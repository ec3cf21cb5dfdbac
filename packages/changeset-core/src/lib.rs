//! Typed partial updates from sparse changesets.
//!
//! This crate applies a mapping of external field tags to new values onto a
//! typed record, writing only the fields named in the mapping. Records
//! declare their fields once through [`Patchable`]; schemas are cached per
//! type in a [`SchemaRegistry`].

pub mod apply;
pub mod audit;
pub mod changeset;
pub mod config;
pub mod error;
pub mod schema;
pub mod value;

pub use apply::{apply_changes, Applier};
pub use audit::{apply_changes_with_modifier, stamp_modifier, AuditFields};
pub use changeset::Changeset;
pub use config::ApplyConfig;
pub use error::{ChangesetError, CoercionFailure, Result};
pub use schema::{DecodeScalar, Patchable, SchemaBuilder, SchemaRegistry};
pub use value::ChangeValue;
