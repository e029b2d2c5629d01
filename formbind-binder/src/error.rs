//! Error types for binder configuration.
//!
//! These are the fail-fast errors. Per-field failures during `bind` are
//! recorded in [`BindingResults`](crate::BindingResults) instead.

use formbind_format::FormatError;
use formbind_model::ModelError;
use thiserror::Error;

/// Result type for binder operations.
pub type BinderResult<T> = Result<T, BinderError>;

#[derive(Debug, Error)]
pub enum BinderError {
    /// The configured path is malformed or does not exist on the model.
    #[error("invalid property path '{path}': {source}")]
    InvalidPropertyPath { path: String, source: ModelError },

    /// No binding exists for the property and none can be created.
    #[error("no binding for property '{0}'")]
    Unbound(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("invalid binder configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to read binder configuration: {0}")]
    Io(#[from] std::io::Error),
}
