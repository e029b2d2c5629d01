//! The binder: resolves bindings, coerces submitted text, writes the model.

use crate::binding::{Binding, BindingConfiguration, BindingOrigin};
use crate::config::BinderConfig;
use crate::results::{BindingResult, BindingResults, FailureKind};
use crate::values::{SubmittedValue, UserValue, UserValues, UserValuesPolicy};
use crate::BinderError;
use formbind_format::{AnnotationFormatterFactory, FormatterRegistry, ValueFormatter};
use formbind_model::{Model, ModelError};
use formbind_types::{PropertyPath, PropertyType};
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, info, warn};

/// Binds user-entered values to the properties of one model.
///
/// A binder is meant for a single request. It is optimistic by default:
/// bindings are synthesized for any path the model resolves. A strict
/// binder only binds paths configured through
/// [`configure_binding`](Self::configure_binding).
pub struct Binder<M: Model> {
    model: M,
    strict: bool,
    empty_as_null: bool,
    list_delimiter: String,
    registry: FormatterRegistry,
    bindings: HashMap<String, Binding>,
    policy: Box<dyn UserValuesPolicy>,
}

impl<M: Model> Binder<M> {
    /// Creates an optimistic binder with the built-in formatters and the
    /// default web-form policy.
    pub fn new(model: M) -> Self {
        Self::with_registry(model, FormatterRegistry::with_defaults())
    }

    /// Creates a binder over a pre-configured (typically shared, cloned)
    /// registry.
    pub fn with_registry(model: M, registry: FormatterRegistry) -> Self {
        Self::with_config(model, registry, &BinderConfig::default())
    }

    pub fn with_config(model: M, registry: FormatterRegistry, config: &BinderConfig) -> Self {
        Self {
            model,
            strict: config.strict,
            empty_as_null: config.empty_as_null,
            list_delimiter: config.list_delimiter.clone(),
            registry,
            bindings: HashMap::new(),
            policy: Box::new(config.policy()),
        }
    }

    /// Replaces the policy used by [`create_user_values`](Self::create_user_values).
    #[must_use]
    pub fn with_policy(mut self, policy: impl UserValuesPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// The model this binder binds to.
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Switches between strict and optimistic mode for later binds.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn registry(&self) -> &FormatterRegistry {
        &self.registry
    }

    /// Registers the formatter for `property_type`, replacing any earlier one.
    pub fn register_formatter(
        &mut self,
        property_type: PropertyType,
        formatter: impl ValueFormatter + 'static,
    ) {
        self.registry.register_formatter(property_type, formatter);
    }

    /// Registers an annotation formatter factory, replacing any earlier one
    /// for the same marker.
    pub fn register_formatter_factory(
        &mut self,
        factory: impl AnnotationFormatterFactory + 'static,
    ) {
        self.registry.register_formatter_factory(factory);
    }

    /// Adds an explicit binding. Reconfiguring a path replaces its binding.
    ///
    /// Fails with [`BinderError::InvalidPropertyPath`] when the path is
    /// malformed or does not exist on the model.
    pub fn configure_binding(
        &mut self,
        configuration: BindingConfiguration,
    ) -> Result<&Binding, BinderError> {
        let invalid = |source: ModelError| BinderError::InvalidPropertyPath {
            path: configuration.property().to_string(),
            source,
        };
        let path = PropertyPath::parse(configuration.property())
            .map_err(|e| invalid(ModelError::Path(e)))?;
        let resolved = self.model.resolve(&path).map_err(invalid)?;

        let key = path.to_string();
        debug!(property = %key, "Binding configured");
        let binding = Binding::explicit(resolved, configuration);
        Ok(match self.bindings.entry(key) {
            Entry::Occupied(mut entry) => {
                entry.insert(binding);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(binding),
        })
    }

    /// Returns the binding for `property`.
    ///
    /// An optimistic binder creates and caches an implicit binding when the
    /// path resolves against the model. A strict binder only returns
    /// explicit bindings, even if an implicit one was cached earlier.
    /// Returns `None` when no usable binding exists.
    pub fn get_binding(&mut self, property: &str) -> Option<&Binding> {
        let key = self.ensure_binding(property).ok()?;
        self.bindings.get(&key)
    }

    /// All bindings created so far, explicit and implicit.
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    /// Builds the value container for [`bind`](Self::bind) using this
    /// binder's policy.
    pub fn create_user_values<I, K>(&self, fields: I) -> UserValues
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();
        self.policy.create(fields, &self.model)
    }

    /// Binds every value in the container onto the model.
    ///
    /// Fields are independent: a failing field is recorded and the rest
    /// still bind. There is no rollback. Writes from fields that succeeded
    /// stay on the model even when other fields fail, so callers relying
    /// on all-or-nothing semantics must bind onto a copy and check
    /// [`BindingResults::has_failures`] first.
    ///
    /// The result holds exactly one entry per submitted value, in order.
    pub fn bind(&mut self, values: &UserValues) -> BindingResults {
        let mut results = Vec::with_capacity(values.len());

        for value in values {
            let result = match self.ensure_binding(value.property()) {
                Ok(key) => {
                    let binding = &self.bindings[&key];
                    bind_field(
                        binding,
                        value,
                        &self.registry,
                        &mut self.model,
                        self.empty_as_null,
                        &self.list_delimiter,
                    )
                }
                Err(message) => BindingResult::rejected(
                    value.property(),
                    value.value().clone(),
                    FailureKind::UnboundProperty,
                    message,
                ),
            };

            if let Some(failure) = result.failure() {
                warn!(
                    property = %value.property(),
                    kind = %failure.kind(),
                    "Binding failed: {}",
                    failure.message()
                );
            }
            results.push(result);
        }

        let results = BindingResults::from(results);
        info!(
            bound = results.len() - results.failure_count(),
            failed = results.failure_count(),
            strict = self.strict,
            "Bind completed"
        );
        results
    }

    /// Renders the model's current value for `property` through its
    /// formatter. Multi-valued properties are joined with the list
    /// delimiter. Returns `Ok(None)` when the property is unset.
    pub fn formatted_value(&mut self, property: &str) -> Result<Option<String>, BinderError> {
        let key = self
            .ensure_binding(property)
            .map_err(|_| BinderError::Unbound(property.to_string()))?;
        let binding = &self.bindings[&key];
        let formatter = binding.resolve_formatter(&self.registry)?;

        let rendered = match self.model.read(binding.property()) {
            None => None,
            Some(Value::Array(items)) if binding.is_multi_valued() => {
                let parts = items
                    .iter()
                    .map(|item| formatter.format_value(item))
                    .collect::<Result<Vec<_>, _>>()?;
                let delimiter = if self.list_delimiter.is_empty() {
                    crate::config::DEFAULT_LIST_DELIMITER
                } else {
                    self.list_delimiter.as_str()
                };
                Some(parts.join(delimiter))
            }
            Some(value) => Some(formatter.format_value(&value)?),
        };
        Ok(rendered)
    }

    /// Finds or (when optimistic) creates the binding for `property` and
    /// returns its key. The error is the reason no binding is available.
    fn ensure_binding(&mut self, property: &str) -> Result<String, String> {
        let path = PropertyPath::parse(property)
            .map_err(|e| format!("'{property}' is not a valid property path: {e}"))?;
        let key = path.to_string();

        if self.strict {
            // Implicit bindings cached while optimistic do not count.
            return match self.bindings.get(&key) {
                Some(binding) if binding.origin() == BindingOrigin::Explicit => Ok(key),
                _ => Err(format!("no binding configured for property '{key}'")),
            };
        }
        if self.bindings.contains_key(&key) {
            return Ok(key);
        }

        let resolved = self.model.resolve(&path).map_err(|e| {
            format!(
                "property '{key}' cannot be bound on model '{}': {e}",
                self.model.schema().name
            )
        })?;
        debug!(property = %key, "Implicit binding created");
        self.bindings.insert(key.clone(), Binding::implicit(resolved));
        Ok(key)
    }
}

fn bind_field<M: Model>(
    binding: &Binding,
    value: &UserValue,
    registry: &FormatterRegistry,
    model: &mut M,
    empty_as_null: bool,
    list_delimiter: &str,
) -> BindingResult {
    let submitted = value.value().clone();

    let formatter = match binding.resolve_formatter(registry) {
        Ok(formatter) => formatter,
        Err(e) => {
            return BindingResult::rejected(
                value.property(),
                submitted,
                FailureKind::Conversion,
                e.to_string(),
            );
        }
    };

    let coerced = match coerce(
        binding,
        formatter.as_ref(),
        &submitted,
        empty_as_null,
        list_delimiter,
    ) {
        Ok(coerced) => coerced,
        Err(message) => {
            return BindingResult::rejected(
                value.property(),
                submitted,
                FailureKind::Conversion,
                message,
            );
        }
    };

    match model.write(binding.property(), coerced.clone()) {
        Ok(()) => BindingResult::bound(value.property(), submitted, coerced),
        Err(e) => BindingResult::rejected(
            value.property(),
            submitted,
            FailureKind::PropertyAccess,
            e.to_string(),
        ),
    }
}

/// Converts submitted text into the JSON value written to the model.
fn coerce(
    binding: &Binding,
    formatter: &dyn ValueFormatter,
    submitted: &SubmittedValue,
    empty_as_null: bool,
    list_delimiter: &str,
) -> Result<Value, String> {
    if binding.is_multi_valued() {
        let items: Vec<&str> = match submitted {
            SubmittedValue::Multiple(items) => items.iter().map(String::as_str).collect(),
            SubmittedValue::Single(text) => split_list(text, list_delimiter),
        };
        return items
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .map(|item| formatter.parse_value(item).map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array);
    }

    let text = match submitted {
        SubmittedValue::Single(text) => text.as_str(),
        SubmittedValue::Multiple(items) => match items.as_slice() {
            [] => "",
            [only] => only.as_str(),
            _ => {
                return Err(format!(
                    "{} values submitted for single-valued property '{}'",
                    items.len(),
                    binding.path()
                ));
            }
        },
    };

    if empty_as_null && text.trim().is_empty() && !binding.property_type().is_text() {
        return Ok(Value::Null);
    }
    formatter.parse_value(text).map_err(|e| e.to_string())
}

fn split_list<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        return vec![text.trim()];
    }
    text.split(delimiter).map(str::trim).collect()
}
