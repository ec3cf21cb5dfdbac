//! Changeset error types.

use thiserror::Error;

/// Changeset application errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangesetError {
    /// Changeset names fields the target record does not have
    #[error("Unknown field(s) for record '{record}': {}", .fields.join(", "))]
    UnknownField { record: String, fields: Vec<String> },

    /// Value cannot be converted to the field's type
    #[error("Cannot coerce value {value} for field '{field}': {reason}")]
    Coercion {
        field: String,
        value: String,
        reason: String,
    },

    /// Record schema could not be built
    #[error("Schema setup failed for record '{record}': {message}")]
    Setup { record: String, message: String },

    /// Changeset could not be constructed from its source
    #[error("Invalid changeset: {0}")]
    InvalidChangeset(String),
}

impl ChangesetError {
    /// Returns `true` for errors caused by the changeset contents rather than
    /// by the record type definition.
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, ChangesetError::Setup { .. })
    }
}

/// Reason a single value could not be coerced.
///
/// Returned by coercion routines and [`DecodeScalar`](crate::schema::DecodeScalar)
/// implementations; the applier attaches field and value context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CoercionFailure(String);

impl CoercionFailure {
    /// Creates a failure with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Returns the failure reason.
    pub fn reason(&self) -> &str {
        &self.0
    }
}

/// Result type for changeset operations.
pub type Result<T> = std::result::Result<T, ChangesetError>;
