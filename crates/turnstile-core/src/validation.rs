use thiserror::Error;

/// Errors produced when parsing externally supplied values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value does not match the expected pattern for the field.
    #[error("{field} does not match expected pattern: {value:?}")]
    PatternMismatch {
        /// Field being validated.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// Required field is empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Field being validated.
        field: &'static str,
    },
    /// Numeric field must be non-zero.
    #[error("{field} must be greater than zero")]
    Zero {
        /// Field being validated.
        field: &'static str,
    },
}
