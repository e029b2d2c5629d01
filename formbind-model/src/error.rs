//! Error types for property resolution and model access.

use formbind_types::PathError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("unknown property '{property}' in path '{path}'")]
    UnknownProperty { path: String, property: String },

    #[error("property '{property}' in path '{path}' is not a list and cannot be indexed")]
    NotIndexable { path: String, property: String },

    #[error("property '{property}' in path '{path}' has no nested properties")]
    NotNested { path: String, property: String },

    #[error("property '{property}' in path '{path}' is a list of objects and needs an index")]
    IndexRequired { path: String, property: String },

    #[error("path '{path}' names an object, not a bindable value")]
    IncompletePath { path: String },

    #[error("cannot write '{path}': {reason}")]
    Write { path: String, reason: String },
}

impl ModelError {
    pub fn write(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::Write {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
