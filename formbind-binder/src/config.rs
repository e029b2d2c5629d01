//! Binder configuration, loadable from TOML.
//!
//! ```toml
//! strict = true
//! empty_as_null = true
//! list_delimiter = ","
//! field_marker_prefix = "_"
//! field_default_prefix = "!"
//! ```
//!
//! Every key is optional.

use crate::BinderError;
use crate::values::{DEFAULT_FIELD_DEFAULT_PREFIX, DEFAULT_FIELD_MARKER_PREFIX, WebFormPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Default delimiter for splitting a single submitted value bound to a
/// multi-valued property.
pub const DEFAULT_LIST_DELIMITER: &str = ",";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Require explicitly configured bindings.
    pub strict: bool,
    /// Bind blank text on non-text properties as `null`.
    pub empty_as_null: bool,
    /// Splits single submitted values for list properties. Empty disables
    /// splitting.
    pub list_delimiter: String,
    /// Prefix of checkbox/multi-select presence markers. Empty disables.
    pub field_marker_prefix: String,
    /// Prefix of fallback-value fields. Empty disables.
    pub field_default_prefix: String,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            strict: false,
            empty_as_null: true,
            list_delimiter: DEFAULT_LIST_DELIMITER.to_string(),
            field_marker_prefix: DEFAULT_FIELD_MARKER_PREFIX.to_string(),
            field_default_prefix: DEFAULT_FIELD_DEFAULT_PREFIX.to_string(),
        }
    }
}

impl BinderConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, BinderError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads configuration from a file. A missing file yields the defaults;
    /// an unreadable or malformed file is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, BinderError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No binder config found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!(strict = config.strict, "Loaded binder config from {:?}", path);
        Ok(config)
    }

    /// The user-values policy matching this configuration.
    pub fn policy(&self) -> WebFormPolicy {
        WebFormPolicy::new(&self.field_marker_prefix, &self.field_default_prefix)
    }
}
