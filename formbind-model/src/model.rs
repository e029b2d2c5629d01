use crate::{ModelError, ModelSchema, ResolvedProperty};
use formbind_types::PropertyPath;
use serde_json::Value;

/// Capability interface for anything a binder can populate.
///
/// Paths are resolved once through [`resolve`](Self::resolve); reads and
/// writes then go through the returned [`ResolvedProperty`] instead of
/// re-resolving by name. Values cross this boundary as JSON: the shape a
/// property's formatter produces is what `write` receives.
pub trait Model {
    /// The property graph of this model.
    fn schema(&self) -> &ModelSchema;

    /// Resolves a path into a fixed accessor.
    fn resolve(&self, path: &PropertyPath) -> Result<ResolvedProperty, ModelError> {
        self.schema().resolve(path)
    }

    /// Reads the current value, or `None` if the property is unset.
    fn read(&self, property: &ResolvedProperty) -> Option<Value>;

    /// Writes a coerced value. `Value::Null` clears the property.
    fn write(&mut self, property: &ResolvedProperty, value: Value) -> Result<(), ModelError>;
}
