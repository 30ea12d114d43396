//! Per-parameter wire validation and primitive type coercion.
//!
//! Runs strictly before any mapper deserialize: a parameter that fails its
//! wire constraints short-circuits the exchange with a 400 and the coercion
//! stage never sees it.

use super::error::ValidationError;
use crate::schema::SchemaNode;
use crate::spec::ParameterMeta;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, error};

/// Convert a raw parameter string to its schema-declared JSON type.
///
/// Arrays split on commas with items converted by the item schema; objects
/// parse as inline JSON. Unparseable values stay strings and are caught by
/// the type check in [`validate_parameter`].
pub fn coerce_wire_type(value: &str, schema: Option<SchemaNode<'_>>) -> Value {
    fn convert_primitive(val: &str, schema: Option<SchemaNode<'_>>) -> Value {
        if let Some(ty) = schema.and_then(|s| s.json_type()) {
            match ty {
                "integer" => val
                    .parse::<i64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(val.to_string())),
                "number" => val
                    .parse::<f64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(val.to_string())),
                "boolean" => val
                    .parse::<bool>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(val.to_string())),
                _ => Value::String(val.to_string()),
            }
        } else {
            Value::String(val.to_string())
        }
    }

    if let Some(ty) = schema.and_then(|s| s.json_type()) {
        match ty {
            "array" => {
                let items_schema = schema.and_then(|s| s.items());
                let parts = value
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|p| convert_primitive(p.trim(), items_schema))
                    .collect::<Vec<_>>();
                Value::Array(parts)
            }
            "object" => serde_json::from_str(value).unwrap_or(Value::String(value.to_string())),
            _ => convert_primitive(value, schema),
        }
    } else {
        Value::String(value.to_string())
    }
}

fn type_matches(declared: &str, raw: &str) -> bool {
    match declared {
        "integer" => raw.parse::<i64>().is_ok(),
        "number" => raw.parse::<f64>().is_ok(),
        "boolean" => raw.parse::<bool>().is_ok(),
        _ => true,
    }
}

/// Validate one parameter against its declared wire constraints.
///
/// Returns the validated wire value (type-coerced when `coerce_types` is on),
/// `Ok(None)` for an absent optional parameter, or the structured error with
/// its deterministic message.
pub fn validate_parameter(
    param: &ParameterMeta,
    raw: Option<&str>,
    coerce_types: bool,
) -> Result<Option<Value>, ValidationError> {
    let raw = match raw {
        Some(r) => r,
        None => {
            if param.required {
                return Err(ValidationError::missing_required(param.location, &param.name));
            }
            return Ok(None);
        }
    };

    let node = param.schema.as_ref().map(SchemaNode::new);

    if let Some(node) = node {
        if let Some(declared) = node.json_type() {
            if !type_matches(declared, raw) {
                return Err(ValidationError::wrong_type(param.location, &param.name, declared));
            }
        }

        if let Some(pattern) = node.pattern() {
            let re = match Regex::new(pattern) {
                Ok(re) => re,
                Err(e) => {
                    error!(
                        name = %param.name,
                        location = %param.location,
                        pattern = pattern,
                        error = %e,
                        "Invalid pattern constraint in document"
                    );
                    return Err(ValidationError::invalid_pattern(param.location, &param.name));
                }
            };
            if !re.is_match(raw) {
                debug!(
                    name = %param.name,
                    location = %param.location,
                    pattern = pattern,
                    "Parameter failed pattern constraint"
                );
                return Err(ValidationError::pattern_mismatch(
                    param.location,
                    &param.name,
                    pattern,
                ));
            }
        }

        if let Some(allowed) = node.enum_values() {
            let coerced = coerce_wire_type(raw, Some(node));
            let as_string = Value::String(raw.to_string());
            if !allowed.contains(&coerced) && !allowed.contains(&as_string) {
                return Err(ValidationError::not_in_enum(param.location, &param.name));
            }
        }
    }

    let value = if coerce_types {
        coerce_wire_type(raw, node)
    } else {
        Value::String(raw.to_string())
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ParameterLocation;
    use serde_json::json;

    fn param(schema: Value, required: bool) -> ParameterMeta {
        ParameterMeta {
            name: "id".to_string(),
            location: ParameterLocation::Path,
            required,
            schema: Some(schema),
        }
    }

    #[test]
    fn test_pattern_failure_message() {
        let p = param(json!({ "type": "string", "pattern": "^[0-9a-fA-F]{24}$" }), true);
        let err = validate_parameter(&p, Some("1234"), true).unwrap_err();
        assert_eq!(
            err.message,
            "request.params.id should match pattern \"^[0-9a-fA-F]{24}$\""
        );
    }

    #[test]
    fn test_invalid_pattern_is_a_server_error() {
        let p = param(json!({ "type": "string", "pattern": "(" }), true);
        let err = validate_parameter(&p, Some("anything"), true).unwrap_err();
        assert_eq!(err.code, 500);
        assert_eq!(
            err.message,
            "request.params.id pattern constraint is not a valid regular expression"
        );
    }

    #[test]
    fn test_missing_required() {
        let p = param(json!({ "type": "string" }), true);
        let err = validate_parameter(&p, None, true).unwrap_err();
        assert_eq!(err.message, "request.params should have required property 'id'");
    }

    #[test]
    fn test_optional_absent_is_skipped() {
        let p = param(json!({ "type": "string" }), false);
        assert_eq!(validate_parameter(&p, None, true).expect("ok"), None);
    }

    #[test]
    fn test_integer_coercion() {
        let p = param(json!({ "type": "integer" }), true);
        let v = validate_parameter(&p, Some("42"), true).expect("ok");
        assert_eq!(v, Some(json!(42)));

        let raw = validate_parameter(&p, Some("42"), false).expect("ok");
        assert_eq!(raw, Some(json!("42")));
    }

    #[test]
    fn test_integer_type_mismatch() {
        let p = param(json!({ "type": "integer" }), true);
        let err = validate_parameter(&p, Some("abc"), true).unwrap_err();
        assert_eq!(err.message, "request.params.id should be integer");
    }

    #[test]
    fn test_enum_check() {
        let p = param(json!({ "type": "string", "enum": ["cat", "dog"] }), true);
        assert!(validate_parameter(&p, Some("cat"), true).is_ok());
        let err = validate_parameter(&p, Some("bird"), true).unwrap_err();
        assert_eq!(
            err.message,
            "request.params.id should be equal to one of the allowed values"
        );
    }

    #[test]
    fn test_array_coercion() {
        let p = param(json!({ "type": "array", "items": { "type": "integer" } }), false);
        let v = validate_parameter(&p, Some("1,2,3"), true).expect("ok");
        assert_eq!(v, Some(json!([1, 2, 3])));
    }
}
