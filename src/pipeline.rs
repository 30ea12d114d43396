//! The per-exchange validation and coercion pipeline.
//!
//! An [`OpenApiValidator`] is constructed once per process from operation
//! metadata and a [`ValidatorConfig`], and is safe for unlimited concurrent
//! use: operations, the mapper registry and the compiled-schema cache are
//! immutable or internally synchronized, and everything per-exchange is
//! allocated fresh.
//!
//! Within one exchange the stages run strictly sequentially:
//!
//! ```text
//! parse -> validate request -> deserialize-coerce -> handler
//!       -> serialize-coerce -> validate response -> encode
//! ```
//!
//! The embedding server drives the two halves via [`process_request`] and
//! [`process_response`].
//!
//! [`process_request`]: OpenApiValidator::process_request
//! [`process_response`]: OpenApiValidator::process_response

use crate::coerce::{coerce_request, coerce_response, CoercedRequest};
use crate::config::{ConfigError, RequestValidation, ResponseValidation, ValidatorConfig};
use crate::mapper::{FieldValue, MapperError, SchemaObjectMapper};
use crate::request::RequestParts;
use crate::spec::{load_spec, OperationMeta, ParameterLocation, ParameterMeta};
use crate::validation::{validate_parameter, ErrorPayload, ValidationError, ValidatorCache};
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

/// Failure while processing a request: a wire-constraint violation (400) or a
/// mapper deserialize error (status chosen by the mapper, default 500).
#[derive(Debug)]
pub enum RequestError {
    Validation(ValidationError),
    Mapper(MapperError),
}

impl RequestError {
    pub fn code(&self) -> u16 {
        match self {
            RequestError::Validation(e) => e.code,
            RequestError::Mapper(e) => e.code,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        match self {
            RequestError::Validation(e) => e.payload(),
            RequestError::Mapper(e) => ErrorPayload {
                message: e.message.clone(),
                code: e.code,
            },
        }
    }

    pub fn to_value(&self) -> Value {
        let p = self.payload();
        serde_json::json!({ "message": p.message, "code": p.code })
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.payload().message)
    }
}

impl std::error::Error for RequestError {}

/// Failure while processing a response body: a serialize error from a mapper
/// entry, or a schema violation after coercion. Both are server-side contract
/// violations, never silently relaxed.
#[derive(Debug)]
pub enum ResponseError {
    Validation(ValidationError),
    Mapper(MapperError),
}

impl ResponseError {
    pub fn code(&self) -> u16 {
        match self {
            ResponseError::Validation(e) => e.code,
            ResponseError::Mapper(e) => e.code,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        match self {
            ResponseError::Validation(e) => e.payload(),
            ResponseError::Mapper(e) => ErrorPayload {
                message: e.message.clone(),
                code: e.code,
            },
        }
    }

    pub fn to_value(&self) -> Value {
        let p = self.payload();
        serde_json::json!({ "message": p.message, "code": p.code })
    }
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.payload().message)
    }
}

impl std::error::Error for ResponseError {}

/// The validator middleware core: immutable per-process state plus the two
/// per-exchange entry points.
pub struct OpenApiValidator {
    operations: Vec<OperationMeta>,
    request_validation: Option<RequestValidation>,
    response_validation: Option<ResponseValidation>,
    mapper: Option<SchemaObjectMapper>,
    cache: ValidatorCache,
}

impl std::fmt::Debug for OpenApiValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenApiValidator")
            .field("operations", &self.operations.len())
            .field("request_validation", &self.request_validation)
            .field("response_validation", &self.response_validation)
            .field(
                "mapper_entries",
                &self.mapper.as_ref().map(|m| m.len()).unwrap_or(0),
            )
            .field("cache", &self.cache)
            .finish()
    }
}

impl OpenApiValidator {
    /// Construct from already-built operation metadata.
    ///
    /// Fails with [`ConfigError::MapperRequiresValidation`] if a schema
    /// object mapper is supplied without both validation stages enabled.
    pub fn new(
        operations: Vec<OperationMeta>,
        config: ValidatorConfig,
    ) -> Result<Self, ConfigError> {
        config.guard()?;
        info!(
            operation_count = operations.len(),
            request_validation = config.validate_requests.is_some(),
            response_validation = config.validate_responses.is_some(),
            mapper_entries = config.schema_object_mapper.as_ref().map(|m| m.len()).unwrap_or(0),
            "OpenAPI validator constructed"
        );
        Ok(OpenApiValidator {
            operations,
            request_validation: config.validate_requests,
            response_validation: config.validate_responses,
            mapper: config.schema_object_mapper,
            cache: ValidatorCache::default(),
        })
    }

    /// Load the OpenAPI document from a file and construct the validator.
    pub fn from_spec_file(path: &str, config: ValidatorConfig) -> anyhow::Result<Self> {
        let operations = load_spec(path)?;
        Ok(Self::new(operations, config)?)
    }

    pub fn operations(&self) -> &[OperationMeta] {
        &self.operations
    }

    /// Look an operation up by its `operationId`.
    pub fn operation(&self, operation_id: &str) -> Option<&OperationMeta> {
        self.operations.iter().find(|op| op.operation_id == operation_id)
    }

    /// Look an operation up by method and declared path pattern. Path
    /// matching against concrete URLs is the embedding router's job.
    pub fn find_operation(&self, method: &Method, path_pattern: &str) -> Option<&OperationMeta> {
        self.operations
            .iter()
            .find(|op| op.method == *method && op.path_pattern == path_pattern)
    }

    fn raw_param<'a>(parts: &'a RequestParts, param: &ParameterMeta) -> Option<&'a str> {
        let bag = match param.location {
            ParameterLocation::Path => &parts.path_params,
            ParameterLocation::Query => &parts.query_params,
            ParameterLocation::Header => &parts.headers,
            ParameterLocation::Cookie => &parts.cookies,
        };
        let key = match param.location {
            ParameterLocation::Header => param.name.to_ascii_lowercase(),
            _ => param.name.clone(),
        };
        bag.get(&key).map(String::as_str)
    }

    /// Validate a request and coerce its parameters.
    ///
    /// Validation short-circuits: the first failing parameter aborts the
    /// exchange with its deterministic error and no mapper deserialize runs
    /// for any parameter of that request.
    pub fn process_request(
        &self,
        op: &OperationMeta,
        parts: &RequestParts,
    ) -> Result<CoercedRequest, RequestError> {
        let mut validated: Vec<(&ParameterMeta, Value)> = Vec::with_capacity(op.parameters.len());

        if let Some(opts) = self.request_validation {
            for param in &op.parameters {
                let raw = Self::raw_param(parts, param);
                match validate_parameter(param, raw, opts.coerce_types) {
                    Ok(Some(value)) => validated.push((param, value)),
                    Ok(None) => {}
                    Err(err) => {
                        debug!(
                            operation_id = %op.operation_id,
                            parameter = %param.name,
                            message = %err.message,
                            "Request validation failed"
                        );
                        return Err(RequestError::Validation(err));
                    }
                }
            }

            if op.request_body_required && parts.body.is_none() {
                return Err(RequestError::Validation(ValidationError::missing_body()));
            }
            if let (Some(schema), Some(body)) = (op.request_schema.as_ref(), parts.body.as_ref()) {
                if let Err(errors) =
                    self.cache
                        .validate(&op.operation_id, "request", None, schema, body)
                {
                    let detail = errors.first().cloned().unwrap_or_default();
                    return Err(RequestError::Validation(ValidationError::body_violation(
                        &detail,
                    )));
                }
            }
        } else {
            // Validation disabled: parameters pass through as raw strings.
            // The configuration guard rules out a mapper in this mode.
            for param in &op.parameters {
                if let Some(raw) = Self::raw_param(parts, param) {
                    validated.push((param, Value::String(raw.to_string())));
                }
            }
        }

        let mut coerced = coerce_request(
            self.mapper.as_ref(),
            op,
            parts,
            validated,
            parts.body.clone(),
        )
        .map_err(RequestError::Mapper)?;

        pass_through_undeclared(&mut coerced, op, parts);
        Ok(coerced)
    }

    /// Serialize-coerce a handler's body, then validate it against the
    /// response schema matched for the status code.
    pub fn process_response(
        &self,
        op: &OperationMeta,
        status: u16,
        body: FieldValue,
    ) -> Result<Value, ResponseError> {
        let content_type = op.content_type_for(status);
        let schema = content_type
            .as_deref()
            .and_then(|ct| op.response_for(status, ct))
            .and_then(|spec| spec.schema.as_ref());

        let wire = coerce_response(self.mapper.as_ref(), schema, body)
            .map_err(ResponseError::Mapper)?;

        if self.response_validation.is_some() {
            if let Some(schema) = schema {
                if let Err(errors) =
                    self.cache
                        .validate(&op.operation_id, "response", Some(status), schema, &wire)
                {
                    let detail = errors.first().cloned().unwrap_or_default();
                    debug!(
                        operation_id = %op.operation_id,
                        status = status,
                        detail = %detail,
                        "Response validation failed"
                    );
                    return Err(ResponseError::Validation(
                        ValidationError::response_violation(&detail),
                    ));
                }
            }
        }

        Ok(wire)
    }
}

/// Raw parameters the operation does not declare pass through verbatim as strings.
fn pass_through_undeclared(coerced: &mut CoercedRequest, op: &OperationMeta, parts: &RequestParts) {
    let declared: HashMap<(&str, ParameterLocation), ()> = op
        .parameters
        .iter()
        .map(|p| ((p.name.as_str(), p.location), ()))
        .collect();

    for (name, value) in &parts.query_params {
        if !declared.contains_key(&(name.as_str(), ParameterLocation::Query)) {
            coerced
                .query_params
                .entry(name.clone())
                .or_insert_with(|| FieldValue::Json(Value::String(value.clone())));
        }
    }
    for (name, value) in &parts.path_params {
        if !declared.contains_key(&(name.as_str(), ParameterLocation::Path)) {
            coerced
                .path_params
                .entry(name.clone())
                .or_insert_with(|| FieldValue::Json(Value::String(value.clone())));
        }
    }
}
