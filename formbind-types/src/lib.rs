//! Core type definitions for formbind.
//!
//! This crate defines the vocabulary shared by every other formbind crate:
//! - [`PropertyPath`]: a parsed, dot-delimited property path (`address.city`, `tags[0]`)
//! - [`PropertyType`]: the value type of a leaf property, used as the formatter registry key
//! - [`PropertyMetadata`] / [`Annotation`]: explicit per-property markers that
//!   drive annotation-based formatter selection
//!
//! Nothing here knows about models, formatters, or binding.

mod metadata;
mod path;
mod property;

pub use metadata::{Annotation, PropertyMetadata};
pub use path::{PathSegment, PropertyPath};
pub use property::PropertyType;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, PathError>;

/// Errors produced while parsing or building a property path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("property path is empty")]
    Empty,

    #[error("empty segment at position {position} in property path '{path}'")]
    EmptySegment { path: String, position: usize },

    #[error("property path '{path}' must start with a property name, not an index")]
    LeadingIndex { path: String },

    #[error("unterminated index starting at position {position} in property path '{path}'")]
    UnterminatedIndex { path: String, position: usize },

    #[error("invalid index '{index}' in property path '{path}'")]
    InvalidIndex { path: String, index: String },

    #[error("unexpected character '{character}' at position {position} in property path '{path}'")]
    UnexpectedCharacter {
        path: String,
        character: char,
        position: usize,
    },

    #[error("'{name}' is not a valid property name")]
    InvalidName { name: String },
}
