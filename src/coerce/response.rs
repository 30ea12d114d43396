//! Response coercion stage: serialize direction.
//!
//! Intercepts the handler's outgoing body before response validation and JSON
//! encoding, walking it against the matched response schema so that domain
//! objects become wire-safe primitives. Response validation then operates on
//! the walked result.

use crate::mapper::{serialize_value, FieldValue, MapperError, SchemaObjectMapper};
use crate::schema::SchemaNode;
use serde_json::Value;

/// Serialize-coerce a handler-built body into a plain JSON value.
///
/// Without a mapper, or without a schema to walk, the body must already be a
/// pure JSON tree: a leftover domain object is a processing error, not
/// something to pass through silently.
pub fn coerce_response(
    mapper: Option<&SchemaObjectMapper>,
    schema: Option<&Value>,
    body: FieldValue,
) -> Result<Value, MapperError> {
    match (mapper, schema) {
        (Some(mapper), Some(schema)) => serialize_value(mapper, SchemaNode::new(schema), body),
        _ => body.into_json().ok_or_else(|| {
            MapperError::new(
                "response body contains a domain object but no mapper/schema is available to serialize it",
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::DomainObject;
    use serde_json::json;

    #[test]
    fn test_plain_body_passes_without_mapper() {
        let body = FieldValue::Json(json!({ "ok": true }));
        assert_eq!(coerce_response(None, None, body).expect("plain json"), json!({ "ok": true }));
    }

    #[test]
    fn test_domain_body_without_mapper_is_loud() {
        let body = FieldValue::Domain(DomainObject::new(7u16));
        assert!(coerce_response(None, None, body).is_err());
    }
}
