//! A schema-described model backed by a JSON document.

use crate::{Model, ModelError, ModelSchema, ResolvedProperty};
use formbind_types::{PathSegment, PropertyPath};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default bound on automatic array growth, see [`JsonModel::with_auto_grow_limit`].
pub const DEFAULT_AUTO_GROW_LIMIT: usize = 256;

/// Generic model whose state is a JSON object.
///
/// Intermediate objects and arrays are created on write; writing past the
/// end of an array pads it with `null`, up to the auto-grow limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonModel {
    schema: ModelSchema,
    data: Value,
    #[serde(default = "default_auto_grow_limit")]
    auto_grow_limit: usize,
}

fn default_auto_grow_limit() -> usize {
    DEFAULT_AUTO_GROW_LIMIT
}

impl JsonModel {
    /// Creates a model with an empty object as its data.
    pub fn new(schema: ModelSchema) -> Self {
        Self {
            schema,
            data: Value::Object(Map::new()),
            auto_grow_limit: DEFAULT_AUTO_GROW_LIMIT,
        }
    }

    /// Creates a model around existing data.
    pub fn with_data(schema: ModelSchema, data: Value) -> Self {
        Self {
            schema,
            data,
            auto_grow_limit: DEFAULT_AUTO_GROW_LIMIT,
        }
    }

    /// Sets how far a write may grow an array. Writing index `i` past the
    /// end of an array is rejected unless `i < limit`; existing elements
    /// stay writable.
    #[must_use]
    pub fn with_auto_grow_limit(mut self, limit: usize) -> Self {
        self.auto_grow_limit = limit;
        self
    }

    pub fn auto_grow_limit(&self) -> usize {
        self.auto_grow_limit
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// Looks up a value by property path (`address.city`, `tags[0]`).
    /// Returns `None` for malformed or absent paths.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let path = PropertyPath::parse(path).ok()?;
        self.data.pointer(&path.to_pointer())
    }

    /// Extract a string value by property path.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Extract an integer value by property path.
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }

    /// Extract a numeric value by property path.
    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }

    /// Extract a boolean value by property path.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }
}

impl Model for JsonModel {
    fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    fn read(&self, property: &ResolvedProperty) -> Option<Value> {
        match self.data.pointer(property.pointer()) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        }
    }

    fn write(&mut self, property: &ResolvedProperty, value: Value) -> Result<(), ModelError> {
        let path = property.path();
        let slot = slot_mut(&mut self.data, path.segments(), self.auto_grow_limit)
            .map_err(|reason| ModelError::write(path, reason))?;
        *slot = value;
        Ok(())
    }
}

/// Walks to the slot for `segments`, creating containers along the way.
fn slot_mut<'a>(
    root: &'a mut Value,
    segments: &[PathSegment],
    grow_limit: usize,
) -> Result<&'a mut Value, String> {
    check_growth(root, segments, grow_limit)?;
    let mut current = root;
    for segment in segments {
        current = match segment {
            PathSegment::Name(name) => {
                if current.is_null() {
                    *current = Value::Object(Map::new());
                }
                let object = current
                    .as_object_mut()
                    .ok_or_else(|| format!("expected an object at '{name}'"))?;
                object.entry(name.clone()).or_insert(Value::Null)
            }
            PathSegment::Index(index) => {
                if current.is_null() {
                    *current = Value::Array(Vec::new());
                }
                let array = current
                    .as_array_mut()
                    .ok_or_else(|| format!("expected an array at index {index}"))?;
                if array.len() <= *index {
                    // check_growth bounds index by grow_limit, so this cannot overflow.
                    array.resize(*index + 1, Value::Null);
                }
                &mut array[*index]
            }
        };
    }
    Ok(current)
}

/// Rejects a write that would grow an array to `grow_limit` elements or
/// more. Runs before anything is created, so a rejected write leaves the
/// data untouched.
fn check_growth(root: &Value, segments: &[PathSegment], grow_limit: usize) -> Result<(), String> {
    let mut current = Some(root);
    for segment in segments {
        current = match segment {
            PathSegment::Name(name) => current.and_then(|value| value.get(name)),
            PathSegment::Index(index) => {
                let len = current.and_then(Value::as_array).map_or(0, Vec::len);
                if *index >= len && *index >= grow_limit {
                    return Err(format!(
                        "index {index} exceeds the auto-grow limit of {grow_limit}"
                    ));
                }
                current.and_then(|value| value.get(*index))
            }
        };
    }
    Ok(())
}
