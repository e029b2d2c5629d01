//! Bindings and binding configuration.

use formbind_format::{FormatError, FormatterRegistry, ValueFormatter};
use formbind_model::ResolvedProperty;
use formbind_types::{Annotation, PropertyMetadata, PropertyPath, PropertyType};
use std::fmt;
use std::sync::Arc;

/// How a binding came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOrigin {
    /// Created through `Binder::configure_binding`.
    Explicit,
    /// Synthesized on demand by an optimistic binder.
    Implicit,
}

/// A request to create a [`Binding`].
#[derive(Clone)]
pub struct BindingConfiguration {
    property: String,
    formatter: Option<Arc<dyn ValueFormatter>>,
    metadata: PropertyMetadata,
}

impl BindingConfiguration {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            formatter: None,
            metadata: PropertyMetadata::new(),
        }
    }

    /// Uses `formatter` for this binding regardless of type or annotations.
    #[must_use]
    pub fn with_formatter(self, formatter: impl ValueFormatter + 'static) -> Self {
        self.with_shared_formatter(Arc::new(formatter))
    }

    #[must_use]
    pub fn with_shared_formatter(mut self, formatter: Arc<dyn ValueFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Adds an annotation for this binding only. Binding annotations are
    /// consulted before the property descriptor's own.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.metadata = self.metadata.with_annotation(annotation);
        self
    }

    pub fn property(&self) -> &str {
        &self.property
    }
}

impl fmt::Debug for BindingConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingConfiguration")
            .field("property", &self.property)
            .field("formatter", &self.formatter.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Association between one resolved property and its formatting rule.
///
/// Immutable once created. The formatter override, if any, is fixed; the
/// registry formatter is looked up on each use so re-registration applies
/// to later binds.
#[derive(Clone)]
pub struct Binding {
    property: ResolvedProperty,
    metadata: PropertyMetadata,
    formatter: Option<Arc<dyn ValueFormatter>>,
    origin: BindingOrigin,
}

impl Binding {
    pub(crate) fn explicit(property: ResolvedProperty, configuration: BindingConfiguration) -> Self {
        let metadata = property.metadata().overlaid_with(&configuration.metadata);
        Self {
            property,
            metadata,
            formatter: configuration.formatter,
            origin: BindingOrigin::Explicit,
        }
    }

    pub(crate) fn implicit(property: ResolvedProperty) -> Self {
        let metadata = property.metadata().clone();
        Self {
            property,
            metadata,
            formatter: None,
            origin: BindingOrigin::Implicit,
        }
    }

    pub fn path(&self) -> &PropertyPath {
        self.property.path()
    }

    /// The resolved accessor used for model reads and writes.
    pub fn property(&self) -> &ResolvedProperty {
        &self.property
    }

    pub fn property_type(&self) -> &PropertyType {
        self.property.property_type()
    }

    pub fn is_multi_valued(&self) -> bool {
        self.property.is_multi_valued()
    }

    /// Effective metadata: binding annotations first, then the descriptor's.
    pub fn metadata(&self) -> &PropertyMetadata {
        &self.metadata
    }

    pub fn origin(&self) -> BindingOrigin {
        self.origin
    }

    pub fn has_formatter_override(&self) -> bool {
        self.formatter.is_some()
    }

    /// Returns the override formatter, else the registry's most specific one.
    pub fn resolve_formatter(
        &self,
        registry: &FormatterRegistry,
    ) -> Result<Arc<dyn ValueFormatter>, FormatError> {
        match &self.formatter {
            Some(formatter) => Ok(Arc::clone(formatter)),
            None => registry.resolve_formatter(self.property_type(), &self.metadata),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("property", &self.property)
            .field("metadata", &self.metadata)
            .field("formatter", &self.formatter.is_some())
            .field("origin", &self.origin)
            .finish()
    }
}
