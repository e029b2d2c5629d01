//! Per-property metadata.
//!
//! Annotations are plain data attached to a property descriptor or to a
//! single binding configuration. A formatter factory registered for an
//! annotation's marker takes precedence over the type-based formatter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A marker plus string attributes, e.g. `date_format { pattern = "%d/%m/%Y" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub marker: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Annotation {
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute, replacing any previous value for the key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Looks up an attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Ordered list of annotations on one property.
///
/// Order matters: when several annotations have registered factories, the
/// first one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMetadata {
    annotations: Vec<Annotation>,
}

impl PropertyMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Returns the first annotation with the given marker.
    #[must_use]
    pub fn find(&self, marker: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.marker == marker)
    }

    #[must_use]
    pub fn has(&self, marker: &str) -> bool {
        self.find(marker).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Returns `overrides` followed by `self`, so the overriding annotations
    /// are consulted first.
    #[must_use]
    pub fn overlaid_with(&self, overrides: &PropertyMetadata) -> Self {
        let mut annotations = overrides.annotations.clone();
        annotations.extend(self.annotations.iter().cloned());
        Self { annotations }
    }
}

impl From<Vec<Annotation>> for PropertyMetadata {
    fn from(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }
}
