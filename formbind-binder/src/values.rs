//! Submitted values and the policies that build them from raw fields.

use formbind_model::Model;
use formbind_types::{PropertyPath, PropertyType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Raw text of one submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmittedValue {
    Single(String),
    Multiple(Vec<String>),
}

impl SubmittedValue {
    /// Converts a raw JSON value into submitted text. Scalars are
    /// stringified, `null` becomes `""`, arrays become `Multiple`.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::Multiple(items.iter().map(scalar_text).collect()),
            other => Self::Single(scalar_text(other)),
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(text) => Some(text),
            Self::Multiple(_) => None,
        }
    }

    pub fn as_multiple(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(items) => Some(items),
        }
    }

    /// `true` when no non-whitespace text was submitted.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Single(text) => text.trim().is_empty(),
            Self::Multiple(items) => items.iter().all(|t| t.trim().is_empty()),
        }
    }

    fn merge(&mut self, other: SubmittedValue) {
        let mut items = match std::mem::replace(self, Self::Multiple(Vec::new())) {
            Self::Single(text) => vec![text],
            Self::Multiple(items) => items,
        };
        match other {
            Self::Single(text) => items.push(text),
            Self::Multiple(more) => items.extend(more),
        }
        *self = Self::Multiple(items);
    }
}

impl fmt::Display for SubmittedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(text) => f.write_str(text),
            Self::Multiple(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for SubmittedValue {
    fn from(text: &str) -> Self {
        Self::Single(text.to_string())
    }
}

impl From<String> for SubmittedValue {
    fn from(text: String) -> Self {
        Self::Single(text)
    }
}

impl From<Vec<String>> for SubmittedValue {
    fn from(items: Vec<String>) -> Self {
        Self::Multiple(items)
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// One raw submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserValue {
    property: String,
    value: SubmittedValue,
}

impl UserValue {
    pub fn new(property: impl Into<String>, value: impl Into<SubmittedValue>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    pub fn single(property: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(property, SubmittedValue::Single(text.into()))
    }

    pub fn multiple<S: Into<String>>(
        property: impl Into<String>,
        items: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            property,
            SubmittedValue::Multiple(items.into_iter().map(Into::into).collect()),
        )
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn value(&self) -> &SubmittedValue {
        &self.value
    }
}

/// Ordered container of submitted values for one bind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserValues {
    values: Vec<UserValue>,
}

impl UserValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: UserValue) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserValue> {
        self.values.iter()
    }

    /// Returns the first value submitted for `property`.
    pub fn get(&self, property: &str) -> Option<&UserValue> {
        self.values.iter().find(|v| v.property == property)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.property.as_str())
    }
}

impl FromIterator<UserValue> for UserValues {
    fn from_iter<I: IntoIterator<Item = UserValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for UserValues {
    type Item = UserValue;
    type IntoIter = std::vec::IntoIter<UserValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a UserValues {
    type Item = &'a UserValue;
    type IntoIter = std::slice::Iter<'a, UserValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Turns a raw field mapping into [`UserValues`].
///
/// The model is available so a policy can pick type-appropriate defaults.
pub trait UserValuesPolicy: Send + Sync {
    fn create(&self, fields: Vec<(String, Value)>, model: &dyn Model) -> UserValues;
}

/// Baseline policy.
///
/// - scalars are stringified, `null` becomes `""`, arrays become `Multiple`
/// - nested objects flatten into dotted paths (`address.city`)
/// - repeated field names merge into one `Multiple` value, kept at the
///   position of their first occurrence
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl DefaultPolicy {
    fn collect(&self, fields: Vec<(String, Value)>) -> UserValues {
        let mut values: Vec<UserValue> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (name, value) in fields {
            flatten(name, &value, &mut |property, submitted| {
                match positions.get(&property) {
                    Some(&index) => values[index].value.merge(submitted),
                    None => {
                        positions.insert(property.clone(), values.len());
                        values.push(UserValue::new(property, submitted));
                    }
                }
            });
        }

        UserValues { values }
    }
}

impl UserValuesPolicy for DefaultPolicy {
    fn create(&self, fields: Vec<(String, Value)>, _model: &dyn Model) -> UserValues {
        self.collect(fields)
    }
}

fn flatten(name: String, value: &Value, sink: &mut dyn FnMut(String, SubmittedValue)) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(format!("{name}.{key}"), nested, sink);
            }
        }
        other => sink(name, SubmittedValue::from_json(other)),
    }
}

/// Default field marker prefix (`_subscribe`).
pub const DEFAULT_FIELD_MARKER_PREFIX: &str = "_";

/// Default field default prefix (`!country`).
pub const DEFAULT_FIELD_DEFAULT_PREFIX: &str = "!";

/// Policy for HTML form submissions.
///
/// Builds on [`DefaultPolicy`] and understands two kinds of companion
/// fields:
/// - a field marker (`_subscribe`) says the control was rendered. If the
///   field itself is absent (an unchecked checkbox, an empty multi-select)
///   it gets its unset value: `"false"` for bool properties, an empty list
///   for multi-valued ones, `""` otherwise.
/// - a field default (`!country=US`) supplies a value used only when the
///   field itself was not submitted. Defaults are applied before markers.
///
/// Companion fields never appear in the resulting container. An empty
/// prefix disables that kind of companion field.
#[derive(Debug, Clone)]
pub struct WebFormPolicy {
    field_marker_prefix: String,
    field_default_prefix: String,
}

impl WebFormPolicy {
    pub fn new(field_marker_prefix: impl Into<String>, field_default_prefix: impl Into<String>) -> Self {
        Self {
            field_marker_prefix: field_marker_prefix.into(),
            field_default_prefix: field_default_prefix.into(),
        }
    }

    pub fn field_marker_prefix(&self) -> &str {
        &self.field_marker_prefix
    }

    pub fn field_default_prefix(&self) -> &str {
        &self.field_default_prefix
    }
}

impl Default for WebFormPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_MARKER_PREFIX, DEFAULT_FIELD_DEFAULT_PREFIX)
    }
}

impl UserValuesPolicy for WebFormPolicy {
    fn create(&self, fields: Vec<(String, Value)>, model: &dyn Model) -> UserValues {
        let mut markers = Vec::new();
        let mut defaults = Vec::new();
        let mut regular = Vec::with_capacity(fields.len());

        for (name, value) in fields {
            if let Some(field) = strip(&name, &self.field_marker_prefix) {
                markers.push(field.to_string());
            } else if let Some(field) = strip(&name, &self.field_default_prefix) {
                defaults.push((field.to_string(), value));
            } else {
                regular.push((name, value));
            }
        }

        let mut values = DefaultPolicy.collect(regular);

        for (field, value) in defaults {
            if !values.contains(&field) {
                values.push(UserValue::new(field, SubmittedValue::from_json(&value)));
            }
        }

        for field in markers {
            if !values.contains(&field) {
                let unset = unset_value(model, &field);
                values.push(UserValue::new(field, unset));
            }
        }

        values
    }
}

fn strip<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    name.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}

fn unset_value(model: &dyn Model, field: &str) -> SubmittedValue {
    let resolved = PropertyPath::parse(field)
        .ok()
        .and_then(|path| model.resolve(&path).ok());
    match resolved {
        Some(property) if property.is_multi_valued() => SubmittedValue::Multiple(Vec::new()),
        Some(property) if *property.property_type() == PropertyType::Bool => {
            SubmittedValue::Single("false".to_string())
        }
        _ => SubmittedValue::Single(String::new()),
    }
}
