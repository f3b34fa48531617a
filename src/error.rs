use crate::model::field::FieldType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CombineError>;

/// Errors raised while combining per-sample calls at a position.
#[derive(Debug, Error)]
pub enum CombineError {
    /// The reference-prefix invariant does not hold for two calls anchored
    /// at the same coordinate.
    #[error(
        "when combining variants at a given position, the shorter reference allele \
         must be a prefix of the longer reference allele: '{shorter}', '{longer}'"
    )]
    InvalidInput { shorter: String, longer: String },

    /// An internal index or type consistency guarantee was broken.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A queried field carries an element type the remappers cannot handle.
    /// Fatal for that field only; the orchestrator skips it and continues.
    #[error("field {field} has element type {field_type:?}, which cannot be remapped")]
    UnsupportedFieldType { field: String, field_type: FieldType },

    #[error("invalid query configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
