//! Error types for ORTF codec operations.

use thiserror::Error;

use crate::schema::FormatVersion;

/// Errors that can occur when decoding, mutating, or assembling ORTF records.
#[derive(Debug, Error)]
pub enum OrtfError {
    /// A line's 2-character prefix does not match the record type.
    #[error("record prefix mismatch: expected {expected:?}, found {found:?}")]
    PrefixMismatch {
        expected: &'static str,
        found: String,
    },

    /// The whole-document prefix sequence does not match `RA SR (RX)+ ST XT`.
    #[error("record sequence {found:?} does not match RA SR (RX)+ ST XT")]
    GrammarViolation { found: String },

    /// The header carries a format version this codec does not know.
    #[error("unknown format version: {code:?}")]
    UnknownVersion { code: String },

    /// A field name has no schema entry for the given format version.
    #[error("unknown field {name:?} in version {version} layout")]
    UnknownField {
        version: FormatVersion,
        name: String,
    },

    /// Mutation attempted on a field whose character class is numeric.
    #[error("field {name:?} is numeric and cannot be modified")]
    WrongFieldClass { name: String },

    /// Mutation value exceeds the field's declared length.
    #[error("value for field {name:?} is {actual} characters, limit is {limit}")]
    ValueTooLong {
        name: String,
        actual: usize,
        limit: usize,
    },
}

/// Result type alias for ORTF codec operations.
pub type Result<T> = std::result::Result<T, OrtfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OrtfError::PrefixMismatch {
            expected: "RA",
            found: "XX".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "record prefix mismatch: expected \"RA\", found \"XX\""
        );

        let err = OrtfError::UnknownVersion {
            code: "99".to_string(),
        };
        assert_eq!(format!("{err}"), "unknown format version: \"99\"");

        let err = OrtfError::ValueTooLong {
            name: "PRODUCT STRENGTH".to_string(),
            actual: 20,
            limit: 15,
        };
        assert!(format!("{err}").contains("limit is 15"));
    }
}
