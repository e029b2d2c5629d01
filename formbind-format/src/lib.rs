//! Formatters for formbind.
//!
//! - [`Formatter`]: typed parse/format pair for one value type
//! - [`ValueFormatter`]: the object-safe JSON form stored by the registry
//! - [`AnnotationFormatterFactory`]: builds a formatter from a property annotation
//! - [`FormatterRegistry`]: type and annotation lookups with last-write-wins registration
//!
//! Built-in formatters cover every standard [`PropertyType`](formbind_types::PropertyType)
//! and are installed by [`FormatterRegistry::with_defaults`].

pub mod builtin;
mod error;
mod factory;
mod formatter;
mod registry;

pub use builtin::{
    BoolFormatter, DateFormatter, DateTimeFormatter, DecimalFormatter, IntegerFormatter,
    TextFormatter,
};
pub use error::{FormatError, FormatResult};
pub use factory::{AnnotationFormatterFactory, DATE_FORMAT_MARKER, DateFormatFactory};
pub use formatter::{Formatter, ValueFormatter};
pub use registry::FormatterRegistry;
