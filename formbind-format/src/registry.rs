//! Formatter registry: type-based formatters plus annotation factories.

use crate::builtin::{
    BoolFormatter, DateFormatter, DateTimeFormatter, DecimalFormatter, IntegerFormatter,
    TextFormatter,
};
use crate::factory::{AnnotationFormatterFactory, DateFormatFactory};
use crate::{FormatError, ValueFormatter};
use formbind_types::{PropertyMetadata, PropertyType};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Holds the formatters a binder resolves against.
///
/// Cloning is cheap: entries are `Arc`-shared, so one configured registry
/// can be cloned into a binder per request. Reads are thread-safe;
/// registration takes `&mut self` and must be serialized by the owner.
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    formatters: HashMap<PropertyType, Arc<dyn ValueFormatter>>,
    factories: HashMap<String, Arc<dyn AnnotationFormatterFactory>>,
}

impl FormatterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in formatters for every standard
    /// property type and the `date_format` factory.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_formatter(PropertyType::Text, TextFormatter);
        registry.register_formatter(PropertyType::Integer, IntegerFormatter);
        registry.register_formatter(PropertyType::Decimal, DecimalFormatter::new());
        registry.register_formatter(PropertyType::Bool, BoolFormatter);
        registry.register_formatter(PropertyType::Date, DateFormatter::default());
        registry.register_formatter(PropertyType::DateTime, DateTimeFormatter::default());
        registry.register_formatter_factory(DateFormatFactory);
        registry
    }

    /// Registers the formatter for `property_type`. A later registration
    /// for the same type replaces the earlier one.
    pub fn register_formatter(
        &mut self,
        property_type: PropertyType,
        formatter: impl ValueFormatter + 'static,
    ) {
        self.register_shared_formatter(property_type, Arc::new(formatter));
    }

    /// Same as [`register_formatter`](Self::register_formatter) for an
    /// already shared formatter.
    pub fn register_shared_formatter(
        &mut self,
        property_type: PropertyType,
        formatter: Arc<dyn ValueFormatter>,
    ) {
        if self.formatters.insert(property_type.clone(), formatter).is_some() {
            debug!(property_type = %property_type, "Formatter replaced");
        }
    }

    /// Registers a factory under its marker. A later factory for the same
    /// marker replaces the earlier one.
    pub fn register_formatter_factory(&mut self, factory: impl AnnotationFormatterFactory + 'static) {
        let marker = factory.marker().to_string();
        if self.factories.insert(marker.clone(), Arc::new(factory)).is_some() {
            debug!(marker = %marker, "Formatter factory replaced");
        }
    }

    /// Returns the formatter registered for a type, ignoring annotations.
    #[must_use]
    pub fn formatter(&self, property_type: &PropertyType) -> Option<Arc<dyn ValueFormatter>> {
        self.formatters.get(property_type).cloned()
    }

    #[must_use]
    pub fn factory(&self, marker: &str) -> Option<Arc<dyn AnnotationFormatterFactory>> {
        self.factories.get(marker).cloned()
    }

    #[must_use]
    pub fn has_formatter(&self, property_type: &PropertyType) -> bool {
        self.formatters.contains_key(property_type)
    }

    pub fn registered_types(&self) -> impl Iterator<Item = &PropertyType> {
        self.formatters.keys()
    }

    /// Returns the most specific formatter for a property.
    ///
    /// The first annotation with a registered factory wins; a factory error
    /// is returned as-is rather than falling back. Without a matching
    /// factory the type formatter is used, else [`FormatError::Unresolved`].
    pub fn resolve_formatter(
        &self,
        property_type: &PropertyType,
        metadata: &PropertyMetadata,
    ) -> Result<Arc<dyn ValueFormatter>, FormatError> {
        for annotation in metadata.annotations() {
            if let Some(factory) = self.factories.get(&annotation.marker) {
                return factory.formatter(annotation, property_type);
            }
        }

        self.formatters
            .get(property_type)
            .cloned()
            .ok_or_else(|| FormatError::Unresolved(property_type.clone()))
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<String> = self.formatters.keys().map(ToString::to_string).collect();
        types.sort();
        let mut markers: Vec<&String> = self.factories.keys().collect();
        markers.sort();
        f.debug_struct("FormatterRegistry")
            .field("formatters", &types)
            .field("factories", &markers)
            .finish()
    }
}
