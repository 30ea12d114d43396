use crate::spec::ParameterLocation;
use serde::Serialize;
use serde_json::Value;

/// Wire shape of a validation or processing failure:
/// `{ "message": ..., "code": ... }`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorPayload {
    pub message: String,
    pub code: u16,
}

/// A structured validation failure with its deterministic message.
///
/// Request-side failures render as
/// `request.<location>.<name> should <constraint-description>` and carry 400;
/// response-side failures are server contract violations and carry 500.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub message: String,
    pub code: u16,
}

impl ValidationError {
    pub fn pattern_mismatch(location: ParameterLocation, name: &str, pattern: &str) -> Self {
        ValidationError {
            message: format!(
                "request.{}.{} should match pattern \"{}\"",
                location.wire_name(),
                name,
                pattern
            ),
            code: 400,
        }
    }

    pub fn wrong_type(location: ParameterLocation, name: &str, expected: &str) -> Self {
        ValidationError {
            message: format!(
                "request.{}.{} should be {}",
                location.wire_name(),
                name,
                expected
            ),
            code: 400,
        }
    }

    pub fn not_in_enum(location: ParameterLocation, name: &str) -> Self {
        ValidationError {
            message: format!(
                "request.{}.{} should be equal to one of the allowed values",
                location.wire_name(),
                name
            ),
            code: 400,
        }
    }

    pub fn missing_required(location: ParameterLocation, name: &str) -> Self {
        ValidationError {
            message: format!(
                "request.{} should have required property '{}'",
                location.wire_name(),
                name
            ),
            code: 400,
        }
    }

    /// The document declared a `pattern` that is not a valid regular
    /// expression. A spec-authoring error, so it surfaces server-side.
    pub fn invalid_pattern(location: ParameterLocation, name: &str) -> Self {
        ValidationError {
            message: format!(
                "request.{}.{} pattern constraint is not a valid regular expression",
                location.wire_name(),
                name
            ),
            code: 500,
        }
    }

    pub fn missing_body() -> Self {
        ValidationError {
            message: "request.body should be present".to_string(),
            code: 400,
        }
    }

    pub fn body_violation(detail: &str) -> Self {
        ValidationError {
            message: format!("request.body {detail}"),
            code: 400,
        }
    }

    pub fn response_violation(detail: &str) -> Self {
        ValidationError {
            message: format!("response.body {detail}"),
            code: 500,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            message: self.message.clone(),
            code: self.code,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "message": self.message, "code": self.code })
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_message_template() {
        let err =
            ValidationError::pattern_mismatch(ParameterLocation::Path, "id", "^[0-9a-fA-F]{24}$");
        assert_eq!(
            err.message,
            "request.params.id should match pattern \"^[0-9a-fA-F]{24}$\""
        );
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_payload_shape() {
        let err = ValidationError::missing_required(ParameterLocation::Query, "limit");
        let v = err.to_value();
        assert_eq!(v["message"], "request.query should have required property 'limit'");
        assert_eq!(v["code"], 400);
    }
}
