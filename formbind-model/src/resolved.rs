use formbind_types::{PropertyMetadata, PropertyPath, PropertyType};

/// A property path resolved once against a schema.
///
/// Holds everything needed to read, write and format the property without
/// walking the schema again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProperty {
    path: PropertyPath,
    pointer: String,
    property_type: PropertyType,
    multi_valued: bool,
    metadata: PropertyMetadata,
}

impl ResolvedProperty {
    pub fn new(
        path: PropertyPath,
        property_type: PropertyType,
        multi_valued: bool,
        metadata: PropertyMetadata,
    ) -> Self {
        let pointer = path.to_pointer();
        Self {
            path,
            pointer,
            property_type,
            multi_valued,
            metadata,
        }
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// JSON pointer to the property (`/address/city`).
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// The leaf type; for multi-valued properties, the element type.
    pub fn property_type(&self) -> &PropertyType {
        &self.property_type
    }

    /// `true` when the property holds a list of values.
    pub fn is_multi_valued(&self) -> bool {
        self.multi_valued
    }

    pub fn metadata(&self) -> &PropertyMetadata {
        &self.metadata
    }
}
