//! Codec error types.
//!
//! Two failure families matter to callers: template errors mean the schema
//! disagrees with observed runtime state and must be fixed at the source;
//! encoding errors mean this particular data cannot be coded under the
//! active operator. Stream-level conditions (truncation, overlong varints)
//! round out the set. The `[ERR Dn]` tags in the messages are part of the
//! diagnostic contract shared with other implementations of this codec
//! family and must stay verbatim.

use fastwire_core::CoreError;
use thiserror::Error;

/// Errors that can occur during FAST encoding/decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FastError {
    /// The template definition is inconsistent with observed runtime state.
    /// Fatal to the call; never retried; fix the schema, not the data.
    #[error("template definition error: {0}")]
    TemplateDefinition(String),

    /// The data or configuration cannot be coded under the active operator.
    /// Fatal to the call; the caller decides whether to abort the message
    /// or the stream.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A stop-bit integer exceeded the representable range.
    #[error("integer overflow")]
    IntegerOverflow,

    /// A schema-derived value could not be constructed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl FastError {
    /// Builds a template-definition error.
    pub(crate) fn template(message: impl Into<String>) -> Self {
        Self::TemplateDefinition(message.into())
    }

    /// Builds an encoding error.
    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Returns true for schema/template-defect errors.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateDefinition(_))
    }

    /// Returns true for data/configuration errors.
    #[must_use]
    pub const fn is_encoding_error(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let template = FastError::template("[ERR D4] Previous value type mismatch.");
        assert!(template.is_template_error());
        assert!(!template.is_encoding_error());

        let encoding = FastError::encoding("Missing mandatory field.");
        assert!(encoding.is_encoding_error());
        assert!(!encoding.is_template_error());
    }

    #[test]
    fn test_error_display_keeps_tag() {
        let err = FastError::template("[ERR D6] Mandatory field is missing.");
        assert_eq!(
            err.to_string(),
            "template definition error: [ERR D6] Mandatory field is missing."
        );
    }
}
