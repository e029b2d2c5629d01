//! Annotation-driven formatter factories.

use crate::builtin::{DateFormatter, DateTimeFormatter};
use crate::{FormatError, ValueFormatter};
use formbind_types::{Annotation, PropertyType};
use std::sync::Arc;

/// Marker handled by [`DateFormatFactory`].
pub const DATE_FORMAT_MARKER: &str = "date_format";

/// Produces a formatter contextualized by an annotated property's metadata.
///
/// A factory is registered under its [`marker`](Self::marker). When a
/// property carries an annotation with that marker, the factory's
/// formatter is used instead of the type-registered one.
pub trait AnnotationFormatterFactory: Send + Sync {
    /// The annotation marker this factory handles.
    fn marker(&self) -> &str;

    /// Builds a formatter for one annotated property.
    fn formatter(
        &self,
        annotation: &Annotation,
        property_type: &PropertyType,
    ) -> Result<Arc<dyn ValueFormatter>, FormatError>;
}

/// Handles `date_format { pattern = "..." }` on `date` and `date_time`
/// properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFormatFactory;

impl AnnotationFormatterFactory for DateFormatFactory {
    fn marker(&self) -> &str {
        DATE_FORMAT_MARKER
    }

    fn formatter(
        &self,
        annotation: &Annotation,
        property_type: &PropertyType,
    ) -> Result<Arc<dyn ValueFormatter>, FormatError> {
        let pattern = annotation.attribute("pattern").ok_or_else(|| {
            FormatError::invalid_annotation(DATE_FORMAT_MARKER, "missing 'pattern' attribute")
        })?;

        match property_type {
            PropertyType::Date => Ok(Arc::new(DateFormatter::new(pattern)?)),
            PropertyType::DateTime => Ok(Arc::new(DateTimeFormatter::new(pattern)?)),
            other => Err(FormatError::invalid_annotation(
                DATE_FORMAT_MARKER,
                format!("applies to date and date_time properties, not {other}"),
            )),
        }
    }
}
