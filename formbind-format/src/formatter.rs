//! Formatter traits.
//!
//! [`Formatter`] is the typed parse/format pair that most implementations
//! write. [`ValueFormatter`] is its object-safe, `serde_json::Value`-based
//! form that the registry and binder store; every `Formatter` gets it for
//! free through a blanket impl.

use crate::FormatError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Bidirectional text conversion for one value type.
pub trait Formatter: Send + Sync {
    /// The parsed value. Its serde representation is what the model stores.
    type Value: Serialize + DeserializeOwned;

    /// Parses submitted text.
    fn parse(&self, text: &str) -> Result<Self::Value, FormatError>;

    /// Renders a value back to display text.
    fn format(&self, value: &Self::Value) -> Result<String, FormatError>;
}

/// Type-erased formatter working on JSON values.
pub trait ValueFormatter: Send + Sync {
    fn parse_value(&self, text: &str) -> Result<Value, FormatError>;

    fn format_value(&self, value: &Value) -> Result<String, FormatError>;
}

impl<F: Formatter> ValueFormatter for F {
    fn parse_value(&self, text: &str) -> Result<Value, FormatError> {
        let parsed = self.parse(text)?;
        Ok(serde_json::to_value(parsed)?)
    }

    fn format_value(&self, value: &Value) -> Result<String, FormatError> {
        let typed: F::Value = serde_json::from_value(value.clone())?;
        self.format(&typed)
    }
}
