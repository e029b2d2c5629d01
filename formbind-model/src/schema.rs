use crate::{ModelError, ResolvedProperty};
use formbind_types::{Annotation, PathSegment, PropertyMetadata, PropertyPath, PropertyType};
use serde::{Deserialize, Serialize};

/// Describes a model's property graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

/// One property of a [`ModelSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(default, skip_serializing_if = "PropertyMetadata::is_empty")]
    pub metadata: PropertyMetadata,
}

/// The shape of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// A single leaf value.
    Value(PropertyType),
    /// A multi-valued leaf (multi-select, checkbox group). Addressable as a
    /// whole (`tags`) or per element (`tags[1]`).
    List(PropertyType),
    /// A nested object; only its own properties are bindable.
    Nested(ModelSchema),
    /// A list of nested objects, addressed as `lines[0].sku`.
    NestedList(ModelSchema),
}

impl PropertyDescriptor {
    fn new(name: &str, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            metadata: PropertyMetadata::new(),
        }
    }

    /// Shorthand for a text property.
    pub fn text(name: &str) -> Self {
        Self::new(name, PropertyKind::Value(PropertyType::Text))
    }

    /// Shorthand for an integer property.
    pub fn integer(name: &str) -> Self {
        Self::new(name, PropertyKind::Value(PropertyType::Integer))
    }

    /// Shorthand for a decimal property.
    pub fn decimal(name: &str) -> Self {
        Self::new(name, PropertyKind::Value(PropertyType::Decimal))
    }

    /// Shorthand for a boolean property.
    pub fn bool(name: &str) -> Self {
        Self::new(name, PropertyKind::Value(PropertyType::Bool))
    }

    /// Shorthand for a calendar date property.
    pub fn date(name: &str) -> Self {
        Self::new(name, PropertyKind::Value(PropertyType::Date))
    }

    /// Shorthand for a local date-time property.
    pub fn date_time(name: &str) -> Self {
        Self::new(name, PropertyKind::Value(PropertyType::DateTime))
    }

    /// Shorthand for a property of an application-defined type.
    pub fn custom(name: &str, type_name: &str) -> Self {
        Self::new(name, PropertyKind::Value(PropertyType::custom(type_name)))
    }

    /// Shorthand for a multi-valued property.
    pub fn list(name: &str, element: PropertyType) -> Self {
        Self::new(name, PropertyKind::List(element))
    }

    /// Shorthand for a nested object.
    pub fn nested(name: &str, schema: ModelSchema) -> Self {
        Self::new(name, PropertyKind::Nested(schema))
    }

    /// Shorthand for a list of nested objects.
    pub fn nested_list(name: &str, schema: ModelSchema) -> Self {
        Self::new(name, PropertyKind::NestedList(schema))
    }

    /// Attaches an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.metadata = self.metadata.with_annotation(annotation);
        self
    }
}

impl ModelSchema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Looks up a direct property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Resolves a path against this schema into a fixed accessor.
    ///
    /// The path must end at a leaf: a value, a whole list, or one list
    /// element. Paths that stop at an object, descend into a leaf, or index
    /// something that is not a list are rejected.
    pub fn resolve(&self, path: &PropertyPath) -> Result<ResolvedProperty, ModelError> {
        let segments = path.segments();
        let mut schema = self;
        let mut i = 0;

        loop {
            let name = match &segments[i] {
                PathSegment::Name(name) => name,
                PathSegment::Index(_) => {
                    return Err(ModelError::NotIndexable {
                        path: path.to_string(),
                        property: segment_owner(segments, i),
                    });
                }
            };

            let descriptor = schema
                .property(name)
                .ok_or_else(|| ModelError::UnknownProperty {
                    path: path.to_string(),
                    property: name.clone(),
                })?;
            let rest = &segments[i + 1..];

            match &descriptor.kind {
                PropertyKind::Value(property_type) => {
                    return match rest.first() {
                        None => Ok(ResolvedProperty::new(
                            path.clone(),
                            property_type.clone(),
                            false,
                            descriptor.metadata.clone(),
                        )),
                        Some(PathSegment::Index(_)) => Err(ModelError::NotIndexable {
                            path: path.to_string(),
                            property: name.clone(),
                        }),
                        Some(PathSegment::Name(_)) => Err(ModelError::NotNested {
                            path: path.to_string(),
                            property: name.clone(),
                        }),
                    };
                }
                PropertyKind::List(property_type) => {
                    return match rest {
                        [] => Ok(ResolvedProperty::new(
                            path.clone(),
                            property_type.clone(),
                            true,
                            descriptor.metadata.clone(),
                        )),
                        [PathSegment::Index(_)] => Ok(ResolvedProperty::new(
                            path.clone(),
                            property_type.clone(),
                            false,
                            descriptor.metadata.clone(),
                        )),
                        _ => Err(ModelError::NotNested {
                            path: path.to_string(),
                            property: name.clone(),
                        }),
                    };
                }
                PropertyKind::Nested(inner) => {
                    if rest.is_empty() {
                        return Err(ModelError::IncompletePath {
                            path: path.to_string(),
                        });
                    }
                    schema = inner;
                    i += 1;
                }
                PropertyKind::NestedList(inner) => match rest {
                    [] | [PathSegment::Index(_)] => {
                        return Err(ModelError::IncompletePath {
                            path: path.to_string(),
                        });
                    }
                    [PathSegment::Name(_), ..] => {
                        return Err(ModelError::IndexRequired {
                            path: path.to_string(),
                            property: name.clone(),
                        });
                    }
                    [PathSegment::Index(_), ..] => {
                        schema = inner;
                        i += 2;
                    }
                },
            }
        }
    }
}

/// Name of the property an index segment at `i` is applied to.
fn segment_owner(segments: &[PathSegment], i: usize) -> String {
    segments[..i]
        .iter()
        .rev()
        .find_map(|s| s.as_name().map(str::to_string))
        .unwrap_or_default()
}
