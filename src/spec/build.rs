use super::types::{OperationMeta, ParameterLocation, ParameterMeta, ResponseSpec, Responses};
use oas3::spec::{ObjectOrReference, Parameter};
use oas3::OpenApiV3Spec;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Resolve a JSON Schema `$ref` to the actual schema definition
///
/// Looks up schema references like `#/components/schemas/ObjectId` in the
/// OpenAPI document and returns the resolved schema object.
pub fn resolve_schema_ref<'a>(
    spec: &'a OpenApiV3Spec,
    ref_path: &str,
) -> Option<&'a oas3::spec::ObjectSchema> {
    if let Some(name) = ref_path.strip_prefix("#/components/schemas/") {
        spec.components
            .as_ref()?
            .schemas
            .get(name)
            .and_then(|schema_ref| match schema_ref {
                ObjectOrReference::Object(schema) => Some(schema),
                _ => None,
            })
    } else {
        None
    }
}

/// Recursively expand all JSON Schema `$ref` references in a value
///
/// Traverses the JSON value tree and replaces any `$ref` objects with their
/// resolved schema definitions. Adds an `x-ref-name` field carrying the
/// component name, which the schema walker treats as a mapped-type annotation
/// when no `format` is declared.
pub fn expand_schema_refs(spec: &OpenApiV3Spec, value: &mut Value) {
    match value {
        Value::Object(obj) => {
            if let Some(ref_path) = obj.get("$ref").and_then(|v| v.as_str()) {
                if let Some(schema) = resolve_schema_ref(spec, ref_path) {
                    if let Ok(mut new_val) = serde_json::to_value(schema) {
                        expand_schema_refs(spec, &mut new_val);
                        if let Some(name) = ref_path.strip_prefix("#/components/schemas/") {
                            if let Value::Object(o) = &mut new_val {
                                o.insert("x-ref-name".to_string(), Value::String(name.to_string()));
                            }
                        }
                        *value = new_val;
                        return;
                    }
                }
            }
            for v in obj.values_mut() {
                expand_schema_refs(spec, v);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                expand_schema_refs(spec, v);
            }
        }
        _ => {}
    }
}

/// Resolve a top-level schema `$ref` to a `Value`, tagged with `x-ref-name`.
///
/// `expand_schema_refs` only sees `$ref` objects nested inside a value, so a
/// schema whose root is a reference must be tagged here or its component name
/// is lost and the walker never maps it.
fn resolve_ref_value(spec: &OpenApiV3Spec, ref_path: &str) -> Option<Value> {
    let schema = resolve_schema_ref(spec, ref_path)?;
    let mut value = serde_json::to_value(schema).ok()?;
    if let Some(name) = ref_path.strip_prefix("#/components/schemas/") {
        if let Value::Object(obj) = &mut value {
            obj.insert("x-ref-name".to_string(), Value::String(name.to_string()));
        }
    }
    Some(value)
}

/// Extract the request body schema and its `required` flag from an operation.
pub fn extract_request_schema(
    spec: &OpenApiV3Spec,
    operation: &oas3::spec::Operation,
) -> (Option<Value>, bool) {
    let mut required = false;
    let mut schema = operation.request_body.as_ref().and_then(|r| match r {
        ObjectOrReference::Object(req_body) => {
            required = req_body.required.unwrap_or(false);
            req_body.content.get("application/json").and_then(|media| {
                match media.schema.as_ref()? {
                    ObjectOrReference::Object(schema_obj) => serde_json::to_value(schema_obj).ok(),
                    ObjectOrReference::Ref { ref_path, .. } => resolve_ref_value(spec, ref_path),
                }
            })
        }
        _ => None,
    });
    if let Some(ref mut val) = schema {
        expand_schema_refs(spec, val);
    }
    (schema, required)
}

/// Extract response schemas for every declared status code and content type.
///
/// Returns the numeric-status map and the `default` response content map.
pub fn extract_responses(
    spec: &OpenApiV3Spec,
    operation: &oas3::spec::Operation,
) -> (Responses, HashMap<String, ResponseSpec>) {
    let mut all: Responses = HashMap::new();
    let mut default_response: HashMap<String, ResponseSpec> = HashMap::new();

    if let Some(responses_map) = operation.responses.as_ref() {
        for (status_str, resp_ref) in responses_map {
            let status: Option<u16> = status_str.parse().ok();
            if status.is_none() && status_str != "default" {
                continue;
            }
            if let ObjectOrReference::Object(resp_obj) = resp_ref {
                for (mt, media) in &resp_obj.content {
                    let example = media.examples.as_ref().and_then(|ex| match ex {
                        oas3::spec::MediaTypeExamples::Example { example } => Some(example.clone()),
                        oas3::spec::MediaTypeExamples::Examples { examples } => {
                            examples.iter().find_map(|(_, v)| match v {
                                ObjectOrReference::Object(obj) => obj.value.clone(),
                                _ => None,
                            })
                        }
                    });

                    let mut schema = match media.schema.as_ref() {
                        Some(ObjectOrReference::Object(schema_obj)) => {
                            serde_json::to_value(schema_obj).ok()
                        }
                        Some(ObjectOrReference::Ref { ref_path, .. }) => {
                            resolve_ref_value(spec, ref_path)
                        }
                        None => None,
                    };
                    if let Some(ref mut val) = schema {
                        expand_schema_refs(spec, val);
                    }

                    let entry = ResponseSpec { schema, example };
                    match status {
                        Some(s) => {
                            all.entry(s).or_default().insert(mt.clone(), entry);
                        }
                        None => {
                            default_response.insert(mt.clone(), entry);
                        }
                    }
                }
            }
        }
    }

    (all, default_response)
}

fn resolve_parameter_ref<'a>(
    spec: &'a OpenApiV3Spec,
    ref_path: &str,
) -> Option<&'a oas3::spec::Parameter> {
    if let Some(name) = ref_path.strip_prefix("#/components/parameters/") {
        spec.components
            .as_ref()?
            .parameters
            .get(name)
            .and_then(|param_ref| match param_ref {
                ObjectOrReference::Object(param) => Some(param),
                _ => None,
            })
    } else {
        None
    }
}

/// Extract parameter metadata, resolving `#/components/parameters/...` refs.
pub fn extract_parameters(
    spec: &OpenApiV3Spec,
    params: &Vec<ObjectOrReference<Parameter>>,
) -> Vec<ParameterMeta> {
    let mut out = Vec::new();
    for p in params {
        let param = match p {
            ObjectOrReference::Object(obj) => Some(obj),
            ObjectOrReference::Ref { ref_path, .. } => resolve_parameter_ref(spec, ref_path),
        };

        if let Some(param) = param {
            let mut schema = param.schema.as_ref().and_then(|s| match s {
                ObjectOrReference::Object(obj) => serde_json::to_value(obj).ok(),
                ObjectOrReference::Ref { ref_path, .. } => resolve_ref_value(spec, ref_path),
            });
            if let Some(ref mut val) = schema {
                expand_schema_refs(spec, val);
            }

            out.push(ParameterMeta {
                name: param.name.clone(),
                location: ParameterLocation::from(param.location),
                required: param.required.unwrap_or(false),
                schema,
            });
        }
    }
    out
}

fn operation_id(
    operation: &oas3::spec::Operation,
    method: &http::Method,
    path: &str,
) -> String {
    operation.operation_id.clone().unwrap_or_else(|| {
        let slug = path
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect::<String>();
        format!("{}_{}", method.as_str().to_ascii_lowercase(), slug.trim_matches('_'))
    })
}

/// Build operation metadata for every path/method pair in the document.
pub fn build_operations(spec: &OpenApiV3Spec) -> anyhow::Result<Vec<OperationMeta>> {
    let mut operations = Vec::new();

    if let Some(paths_map) = spec.paths.as_ref() {
        for (path, item) in paths_map {
            for (method, operation) in item.methods() {
                let op_id = operation_id(operation, &method, path);

                let (request_schema, request_body_required) =
                    extract_request_schema(spec, operation);
                let (responses, default_response) = extract_responses(spec, operation);

                let mut parameters = Vec::new();
                parameters.extend(extract_parameters(spec, &item.parameters));
                parameters.extend(extract_parameters(spec, &operation.parameters));

                debug!(
                    operation_id = %op_id,
                    method = %method,
                    path = %path,
                    param_count = parameters.len(),
                    has_request_schema = request_schema.is_some(),
                    response_statuses = responses.len(),
                    "Operation metadata built"
                );

                operations.push(OperationMeta {
                    method: method.clone(),
                    path_pattern: path.clone(),
                    operation_id: op_id,
                    parameters,
                    request_schema,
                    request_body_required,
                    responses,
                    default_response,
                });
            }
        }
    }

    Ok(operations)
}
