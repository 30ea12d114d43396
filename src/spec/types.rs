use http::Method;
use serde_json::Value;

/// Where a parameter is carried on the wire.
///
/// The names used in validation error messages (`params`, `query`, `headers`,
/// `cookies`) follow the `request.<location>.<name>` template and are produced
/// by [`ParameterLocation::wire_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Location segment used in error messages, e.g. `request.params.id`.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "params",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "headers",
            ParameterLocation::Cookie => "cookies",
        }
    }
}

impl From<oas3::spec::ParameterIn> for ParameterLocation {
    fn from(loc: oas3::spec::ParameterIn) -> Self {
        match loc {
            oas3::spec::ParameterIn::Path => ParameterLocation::Path,
            oas3::spec::ParameterIn::Query => ParameterLocation::Query,
            oas3::spec::ParameterIn::Header => ParameterLocation::Header,
            oas3::spec::ParameterIn::Cookie => ParameterLocation::Cookie,
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A single resolved operation from the OpenAPI document.
///
/// Schemas are stored as self-contained `serde_json::Value` trees with all
/// `#/components/schemas/...` references expanded inline, so no further
/// resolution is needed per exchange. Immutable after load and shared by
/// reference across all exchanges.
#[derive(Debug, Clone)]
pub struct OperationMeta {
    pub method: Method,
    pub path_pattern: String,
    /// `operationId` from the document; falls back to `<method>_<path>` slug.
    pub operation_id: String,
    pub parameters: Vec<ParameterMeta>,
    pub request_schema: Option<Value>,
    pub request_body_required: bool,
    /// Response schemas keyed by status code, then content type.
    pub responses: Responses,
    /// Schemas under the `default` response, keyed by content type.
    pub default_response: std::collections::HashMap<String, ResponseSpec>,
}

impl OperationMeta {
    /// Response spec for a status code, falling back to the `default` response.
    pub fn response_for(&self, status: u16, content_type: &str) -> Option<&ResponseSpec> {
        self.responses
            .get(&status)
            .and_then(|m| m.get(content_type))
            .or_else(|| self.default_response.get(content_type))
    }

    /// First declared content type for a status code.
    pub fn content_type_for(&self, status: u16) -> Option<String> {
        self.responses
            .get(&status)
            .or(Some(&self.default_response))
            .and_then(|m| {
                m.get("application/json")
                    .map(|_| "application/json".to_string())
                    .or_else(|| m.keys().next().cloned())
            })
    }
}

#[derive(Debug, Clone)]
pub struct ParameterMeta {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    pub schema: Option<Value>,
    pub example: Option<Value>,
}

pub type Responses =
    std::collections::HashMap<u16, std::collections::HashMap<String, ResponseSpec>>;
