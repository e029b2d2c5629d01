//! Built-in formatters for the standard property types.

use crate::{FormatError, Formatter};
use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// Default pattern for [`DateFormatter`] (ISO 8601 calendar date).
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";

/// Patterns accepted by the default [`DateTimeFormatter`]. The first is
/// used for rendering; the second matches what HTML `datetime-local`
/// inputs submit.
pub const DEFAULT_DATE_TIME_PATTERNS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Passes text through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl Formatter for TextFormatter {
    type Value = String;

    fn parse(&self, text: &str) -> Result<String, FormatError> {
        Ok(text.to_string())
    }

    fn format(&self, value: &String) -> Result<String, FormatError> {
        Ok(value.clone())
    }
}

/// Signed 64-bit integers. Surrounding whitespace is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerFormatter;

impl Formatter for IntegerFormatter {
    type Value = i64;

    fn parse(&self, text: &str) -> Result<i64, FormatError> {
        text.trim()
            .parse::<i64>()
            .map_err(|e| FormatError::parse(text, "integer", e))
    }

    fn format(&self, value: &i64) -> Result<String, FormatError> {
        Ok(value.to_string())
    }
}

/// Finite `f64` values, optionally rendered with a fixed number of
/// fraction digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalFormatter {
    scale: Option<usize>,
}

impl DecimalFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders with exactly `scale` fraction digits. Parsing is unaffected.
    #[must_use]
    pub fn with_scale(scale: usize) -> Self {
        Self { scale: Some(scale) }
    }
}

impl Formatter for DecimalFormatter {
    type Value = f64;

    fn parse(&self, text: &str) -> Result<f64, FormatError> {
        let value = text
            .trim()
            .parse::<f64>()
            .map_err(|e| FormatError::parse(text, "decimal", e))?;
        if !value.is_finite() {
            return Err(FormatError::parse(text, "decimal", "value is not finite"));
        }
        Ok(value)
    }

    fn format(&self, value: &f64) -> Result<String, FormatError> {
        Ok(match self.scale {
            Some(scale) => format!("{value:.scale$}"),
            None => value.to_string(),
        })
    }
}

/// Booleans. Accepts `true/false`, `on/off`, `yes/no` and `1/0`,
/// case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolFormatter;

impl Formatter for BoolFormatter {
    type Value = bool;

    fn parse(&self, text: &str) -> Result<bool, FormatError> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" => Ok(false),
            _ => Err(FormatError::parse(
                text,
                "bool",
                "expected one of true/false, on/off, yes/no, 1/0",
            )),
        }
    }

    fn format(&self, value: &bool) -> Result<String, FormatError> {
        Ok(value.to_string())
    }
}

/// Calendar dates using a strftime pattern.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    pattern: String,
}

impl DateFormatter {
    /// Creates a formatter for `pattern`, rejecting malformed patterns.
    pub fn new(pattern: impl Into<String>) -> Result<Self, FormatError> {
        let pattern = pattern.into();
        validate_pattern(&pattern)?;
        Ok(Self { pattern })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_PATTERN.to_string(),
        }
    }
}

impl Formatter for DateFormatter {
    type Value = NaiveDate;

    fn parse(&self, text: &str) -> Result<NaiveDate, FormatError> {
        NaiveDate::parse_from_str(text.trim(), &self.pattern)
            .map_err(|e| FormatError::parse(text, format!("date ({})", self.pattern), e))
    }

    fn format(&self, value: &NaiveDate) -> Result<String, FormatError> {
        let mut out = String::new();
        write!(out, "{}", value.format(&self.pattern))
            .map_err(|e| FormatError::render("date", e))?;
        Ok(out)
    }
}

/// Local date-times. Parsing tries each pattern in order; rendering uses
/// the first.
#[derive(Debug, Clone)]
pub struct DateTimeFormatter {
    patterns: Vec<String>,
}

impl DateTimeFormatter {
    /// Creates a formatter for a single pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self, FormatError> {
        let pattern = pattern.into();
        validate_pattern(&pattern)?;
        Ok(Self {
            patterns: vec![pattern],
        })
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for DateTimeFormatter {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_DATE_TIME_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

impl Formatter for DateTimeFormatter {
    type Value = NaiveDateTime;

    fn parse(&self, text: &str) -> Result<NaiveDateTime, FormatError> {
        let trimmed = text.trim();
        let mut last_error = None;
        for pattern in &self.patterns {
            match NaiveDateTime::parse_from_str(trimmed, pattern) {
                Ok(value) => return Ok(value),
                Err(e) => last_error = Some(e),
            }
        }
        let reason = last_error.map_or_else(
            || "no patterns configured".to_string(),
            |e| e.to_string(),
        );
        Err(FormatError::parse(text, "date_time", reason))
    }

    fn format(&self, value: &NaiveDateTime) -> Result<String, FormatError> {
        let pattern = self
            .patterns
            .first()
            .ok_or_else(|| FormatError::render("date_time", "no patterns configured"))?;
        let mut out = String::new();
        write!(out, "{}", value.format(pattern))
            .map_err(|e| FormatError::render("date_time", e))?;
        Ok(out)
    }
}

fn validate_pattern(pattern: &str) -> Result<(), FormatError> {
    if pattern.is_empty() {
        return Err(FormatError::InvalidPattern {
            pattern: String::new(),
            reason: "pattern is empty".to_string(),
        });
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(FormatError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "unrecognized format specifier".to_string(),
        });
    }
    Ok(())
}
