//! The schema walker: recursive traversal of a value together with its
//! resolved schema node, applying registered mapper entries.
//!
//! Two directions exist. `deserialize_value` runs after request validation
//! and replaces wire primitives with domain objects; `serialize_value` runs
//! before response validation and replaces domain objects with their
//! canonical wire form.
//!
//! Traversal rules:
//! - A node carrying a registered type annotation receives the entry applied
//!   to the entire current value; the walker does not descend into that
//!   subtree. The outermost mapped annotation wins when mapped nodes nest;
//!   composite mapped types are the entry's own business.
//! - Object nodes recurse into declared properties present in the value;
//!   everything else (additional properties included) is preserved verbatim.
//! - Array nodes recurse into each item with the item schema.
//! - Null and absent values are never handed to a mapper function.
//! - Entry errors propagate; the walker never swallows them.

use super::entry::MapperError;
use super::registry::SchemaObjectMapper;
use super::value::FieldValue;
use crate::schema::SchemaNode;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Walk a validated wire value in the deserialize direction, producing the
/// coerced tree the handler observes.
pub fn deserialize_value(
    mapper: &SchemaObjectMapper,
    node: SchemaNode<'_>,
    value: &Value,
) -> Result<FieldValue, MapperError> {
    if value.is_null() {
        return Ok(FieldValue::Json(Value::Null));
    }

    if let Some(name) = node.annotation() {
        if let Some(entry) = mapper.lookup(name) {
            debug!(annotation = name, "Deserializing mapped schema value");
            return entry.deserialize(value).map(FieldValue::Domain);
        }
    }

    match (node.json_type(), value) {
        (Some("object"), Value::Object(fields)) => {
            let mut out = HashMap::with_capacity(fields.len());
            for (key, field_val) in fields {
                match node.property(key) {
                    Some(prop_node) => {
                        out.insert(key.clone(), deserialize_value(mapper, prop_node, field_val)?);
                    }
                    // Undeclared properties pass through untouched.
                    None => {
                        out.insert(key.clone(), FieldValue::Json(field_val.clone()));
                    }
                }
            }
            Ok(FieldValue::Object(out))
        }
        (Some("array"), Value::Array(items)) => match node.items() {
            Some(item_node) => {
                let walked = items
                    .iter()
                    .map(|item| deserialize_value(mapper, item_node, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FieldValue::Array(walked))
            }
            None => Ok(FieldValue::Json(value.clone())),
        },
        _ => Ok(FieldValue::Json(value.clone())),
    }
}

/// Walk a handler-built value in the serialize direction, producing a plain
/// JSON-safe tree ready for response validation and encoding.
///
/// A mapped node whose value is already plain JSON passes through unchanged;
/// serialize functions only ever receive domain objects. A domain object
/// under an unmapped node is an error: it has no generic JSON encoding, and
/// silently emitting its debug form would corrupt the wire format.
pub fn serialize_value(
    mapper: &SchemaObjectMapper,
    node: SchemaNode<'_>,
    value: FieldValue,
) -> Result<Value, MapperError> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    if let Some(name) = node.annotation() {
        if let Some(entry) = mapper.lookup(name) {
            return match value {
                FieldValue::Domain(ref obj) => {
                    debug!(annotation = name, "Serializing mapped domain value");
                    entry.serialize(obj)
                }
                // Already wire format; nothing to convert.
                other => other.into_json().ok_or_else(|| {
                    MapperError::new(format!(
                        "domain value nested inside mapped type \"{name}\" was not serialized"
                    ))
                }),
            };
        }
    }

    match value {
        FieldValue::Domain(obj) => Err(MapperError::new(format!(
            "no serializer registered for domain value {} at an unmapped schema node",
            obj.type_name()
        ))),
        FieldValue::Object(fields) => {
            let mut out = serde_json::Map::with_capacity(fields.len());
            for (key, field_val) in fields {
                match node.property(&key) {
                    Some(prop_node) => {
                        out.insert(key, serialize_value(mapper, prop_node, field_val)?);
                    }
                    None => {
                        let json = field_val.into_json().ok_or_else(|| {
                            MapperError::new(format!(
                                "domain value in undeclared response property \"{key}\""
                            ))
                        })?;
                        out.insert(key, json);
                    }
                }
            }
            Ok(Value::Object(out))
        }
        FieldValue::Array(items) => match node.items() {
            Some(item_node) => {
                let walked = items
                    .into_iter()
                    .map(|item| serialize_value(mapper, item_node, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(walked))
            }
            None => FieldValue::Array(items)
                .into_json()
                .ok_or_else(|| MapperError::new("domain value in untyped array")),
        },
        FieldValue::Json(v) => Ok(v),
    }
}
