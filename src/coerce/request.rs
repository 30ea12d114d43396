//! Request coercion stage: deserialize direction.
//!
//! Runs after parameter and body validation succeed. Each validated wire
//! value is walked with its schema and replaced by the deserialized result in
//! the parameter bag the handler observes. If validation failed, this stage
//! never runs for that exchange.

use crate::mapper::{deserialize_value, FieldValue, MapperError, SchemaObjectMapper};
use crate::request::RequestParts;
use crate::schema::SchemaNode;
use crate::spec::{OperationMeta, ParameterLocation, ParameterMeta};
use http::Method;
use serde_json::Value;
use std::collections::HashMap;

/// The parameter bag a handler observes after validation and coercion.
///
/// Values whose schema carried a mapped type annotation are
/// [`FieldValue::Domain`] objects; everything else is the validated wire
/// value. Exchange-local: created fresh per request, never shared.
#[derive(Debug, Default)]
pub struct CoercedRequest {
    pub method: Method,
    pub path: String,
    pub path_params: HashMap<String, FieldValue>,
    pub query_params: HashMap<String, FieldValue>,
    pub headers: HashMap<String, FieldValue>,
    pub cookies: HashMap<String, FieldValue>,
    pub body: Option<FieldValue>,
}

impl CoercedRequest {
    fn bag_mut(&mut self, location: ParameterLocation) -> &mut HashMap<String, FieldValue> {
        match location {
            ParameterLocation::Path => &mut self.path_params,
            ParameterLocation::Query => &mut self.query_params,
            ParameterLocation::Header => &mut self.headers,
            ParameterLocation::Cookie => &mut self.cookies,
        }
    }

    /// Look a parameter up by name across path, then query.
    pub fn param(&self, name: &str) -> Option<&FieldValue> {
        self.path_params.get(name).or_else(|| self.query_params.get(name))
    }
}

/// Build the coerced parameter bag from validated wire values.
///
/// `validated` pairs each parameter's metadata with the value that passed
/// validation. Without a mapper the values pass through as plain JSON.
pub fn coerce_request(
    mapper: Option<&SchemaObjectMapper>,
    op: &OperationMeta,
    parts: &RequestParts,
    validated: Vec<(&ParameterMeta, Value)>,
    body: Option<Value>,
) -> Result<CoercedRequest, MapperError> {
    let mut out = CoercedRequest {
        method: parts.method.clone(),
        path: parts.path.clone(),
        ..Default::default()
    };

    for (param, value) in validated {
        let coerced = match (mapper, param.schema.as_ref()) {
            (Some(mapper), Some(schema)) => {
                deserialize_value(mapper, SchemaNode::new(schema), &value)?
            }
            _ => FieldValue::Json(value),
        };
        out.bag_mut(param.location).insert(param.name.clone(), coerced);
    }

    out.body = match body {
        Some(value) => Some(match (mapper, op.request_schema.as_ref()) {
            (Some(mapper), Some(schema)) => {
                deserialize_value(mapper, SchemaNode::new(schema), &value)?
            }
            _ => FieldValue::Json(value),
        }),
        None => None,
    };

    Ok(out)
}
