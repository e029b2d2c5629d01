use serde::{Deserialize, Serialize};
use std::fmt;

/// The value type of a leaf property.
///
/// This is the key formatters are registered under. `Custom` covers
/// application types (money, phone numbers, enums) that have no built-in
/// formatter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Text,
    Integer,
    Decimal,
    Bool,
    Date,
    DateTime,
    Custom(String),
}

impl PropertyType {
    /// Shorthand for a custom, application-defined type.
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Returns the type name as used in diagnostics and schemas.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::Custom(name) => name,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
