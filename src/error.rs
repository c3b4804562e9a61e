//! Error types for the observation log
//!
//! Every failure is local to the caller's log and recoverable: a rejected
//! operation leaves the recorded history exactly as it was.

use thiserror::Error;

use crate::schema::FieldType;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Observation log error types
#[derive(Error, Debug)]
pub enum Error {
    /// A derivation or record read a field that has never been set
    #[error("Missing value: field '{field}' is unset\nSet it before deriving or recording")]
    MissingValue {
        /// Name of the unset field
        field: String,
    },

    /// The live field set no longer matches the fields of recorded rows
    #[error("Schema mismatch: history has fields [{expected}], log declares [{found}]\nRows must share one field set")]
    SchemaMismatch {
        /// Field names of the recorded history
        expected: String,
        /// Field names currently declared on the log
        found: String,
    },

    /// Field name not declared in the schema
    #[error("Unknown field: '{0}'")]
    UnknownField(String),

    /// Value type differs from the field's declared type
    #[error("Type mismatch on field '{field}': declared {expected}, got {found}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Declared type
        expected: FieldType,
        /// Type of the rejected value
        found: FieldType,
    },

    /// Schema or derivation definition is invalid
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// `derive()` called on a log built without a derivation
    #[error("No derivation configured for this log")]
    NoDerivation,

    /// Integer overflow or remainder by zero
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// Arrow error while building the tabular handoff
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
