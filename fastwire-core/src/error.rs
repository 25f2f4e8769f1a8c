//! Error types for FastWire core operations.

use crate::field::IntKind;
use thiserror::Error;

/// Errors raised while constructing schema-derived values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An initial-value literal from the schema could not be parsed.
    #[error("invalid {kind} literal: '{value}'")]
    InvalidLiteral {
        /// The literal text as it appeared in the schema.
        value: String,
        /// The integer kind the literal was parsed as.
        kind: IntKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_literal_display() {
        let err = CoreError::InvalidLiteral {
            value: "abc".to_string(),
            kind: IntKind::UInt32,
        };
        assert_eq!(err.to_string(), "invalid uInt32 literal: 'abc'");
    }
}
