//! Error types for formatting and formatter resolution.

use formbind_types::PropertyType;
use thiserror::Error;

/// Result type for formatter operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors raised while parsing, rendering, or resolving formatters.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Submitted text could not be parsed into the target type.
    #[error("cannot parse '{input}' as {expected}: {reason}")]
    Parse {
        input: String,
        expected: String,
        reason: String,
    },

    /// Neither an annotation factory nor a type formatter applies.
    #[error("no formatter registered for property type '{0}'")]
    Unresolved(PropertyType),

    /// A model value could not be rendered back to text.
    #[error("cannot render value as {expected}: {reason}")]
    Render { expected: String, reason: String },

    /// An annotation is missing required attributes or is applied to the
    /// wrong property type.
    #[error("invalid '{marker}' annotation: {reason}")]
    InvalidAnnotation { marker: String, reason: String },

    /// A date or time pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Conversion between a typed value and its JSON form failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormatError {
    pub fn parse(
        input: impl Into<String>,
        expected: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::Parse {
            input: input.into(),
            expected: expected.into(),
            reason: reason.to_string(),
        }
    }

    pub fn render(expected: impl Into<String>, reason: impl ToString) -> Self {
        Self::Render {
            expected: expected.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_annotation(marker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAnnotation {
            marker: marker.into(),
            reason: reason.into(),
        }
    }
}
