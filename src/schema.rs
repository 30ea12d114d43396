//! Borrowed view over a resolved schema node.
//!
//! Operation metadata stores schemas as self-contained `serde_json::Value`
//! trees (see [`crate::spec`]). `SchemaNode` wraps a reference to such a tree
//! and exposes the attributes the walker and the parameter validator need:
//! the underlying JSON type, the mapped-type annotation, nested property and
//! item schemas, and the constraints checked on wire values.

use serde_json::{Map, Value};

/// A node in the resolved API specification's type tree.
///
/// Cheap to copy; borrows the schema `Value` owned by operation metadata.
#[derive(Debug, Clone, Copy)]
pub struct SchemaNode<'a> {
    raw: &'a Value,
}

impl<'a> SchemaNode<'a> {
    pub fn new(raw: &'a Value) -> Self {
        SchemaNode { raw }
    }

    /// The underlying JSON type (`object`, `array`, `string`, ...), if declared.
    pub fn json_type(&self) -> Option<&'a str> {
        self.raw.get("type").and_then(Value::as_str)
    }

    /// The mapped-type annotation for this node.
    ///
    /// A declared `format` wins; otherwise the `x-ref-name` marker left by
    /// `$ref` expansion is used, so both `format: ObjectId` and
    /// `$ref: '#/components/schemas/ObjectId'` resolve to `ObjectId`.
    pub fn annotation(&self) -> Option<&'a str> {
        self.raw
            .get("format")
            .and_then(Value::as_str)
            .or_else(|| self.raw.get("x-ref-name").and_then(Value::as_str))
    }

    /// Declared object property schemas.
    pub fn properties(&self) -> Option<&'a Map<String, Value>> {
        self.raw.get("properties").and_then(Value::as_object)
    }

    /// Schema for a single declared property.
    pub fn property(&self, name: &str) -> Option<SchemaNode<'a>> {
        self.properties().and_then(|p| p.get(name)).map(SchemaNode::new)
    }

    /// Item schema for array nodes.
    pub fn items(&self) -> Option<SchemaNode<'a>> {
        self.raw.get("items").map(SchemaNode::new)
    }

    /// `pattern` constraint on string nodes.
    pub fn pattern(&self) -> Option<&'a str> {
        self.raw.get("pattern").and_then(Value::as_str)
    }

    /// `enum` constraint values.
    pub fn enum_values(&self) -> Option<&'a Vec<Value>> {
        self.raw.get("enum").and_then(Value::as_array)
    }

    /// Whether undeclared object properties are permitted (default: yes).
    pub fn additional_properties_allowed(&self) -> bool {
        match self.raw.get("additionalProperties") {
            Some(Value::Bool(false)) => false,
            _ => true,
        }
    }

    pub fn as_value(&self) -> &'a Value {
        self.raw
    }
}
