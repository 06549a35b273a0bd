//! Error taxonomy for stop-number grouping.

use thiserror::Error;

/// Reasons a grouping call is rejected.
///
/// Every variant aborts the whole call; no partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// A required field is absent.
    #[error("missing \"{field}\" property in {context}")]
    MissingField { field: String, context: String },

    /// A field is present but holds the wrong kind of value.
    #[error("non-{expected} \"{field}\" property found in {context}. Found: {found} (type: {found_type})")]
    Type {
        field: String,
        expected: &'static str,
        context: String,
        found: String,
        found_type: &'static str,
    },

    /// A stop number contains something other than decimal digits.
    #[error("found a \"{field}\" property containing non-digit characters in the data for key \"{label}\". Found: \"{value}\"")]
    Format {
        field: String,
        label: String,
        value: String,
    },

    /// A stop number is zero.
    #[error("stop numbers must be greater than 0. Violation found in the data for key \"{label}\". Found: \"{value}\"")]
    Range { label: String, value: String },

    /// A label is empty or collides with the stop number field name.
    #[error("invalid label \"{label}\": {reason}")]
    InvalidLabel { label: String, reason: String },

    /// A label appears on more than one set.
    #[error("duplicate label \"{label}\" in input")]
    DuplicateLabel { label: String },
}

impl GroupError {
    /// Short machine-friendly name of the variant, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GroupError::MissingField { .. } => "missing_field",
            GroupError::Type { .. } => "type",
            GroupError::Format { .. } => "format",
            GroupError::Range { .. } => "range",
            GroupError::InvalidLabel { .. } => "invalid_label",
            GroupError::DuplicateLabel { .. } => "duplicate_label",
        }
    }
}
