#![allow(clippy::unwrap_used, clippy::expect_used)]

use http::Method;
use oas3::OpenApiV3Spec;
use oasmap::spec::ParameterLocation;
use oasmap::{load_spec, load_spec_from_spec};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

const YAML_SPEC: &str = r#"openapi: 3.1.0
info:
  title: Test API
  version: "1.0.0"
components:
  schemas:
    Item:
      type: object
      properties:
        id: { type: string, format: ObjectId }
        name: { type: string }
  parameters:
    IdParam:
      name: id
      in: path
      required: true
      schema: { type: string, pattern: "^[0-9a-fA-F]{24}$" }
paths:
  /items/{id}:
    put:
      operationId: update_item
      parameters:
        - $ref: '#/components/parameters/IdParam'
        - name: debug
          in: query
          required: false
          schema: { type: boolean }
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Item'
      responses:
        "200":
          description: OK
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Item'
        default:
          description: Error
          content:
            application/json:
              schema:
                type: object
                properties:
                  message: { type: string }
"#;

fn write_temp_spec(prefix: &str, ext: &str, contents: &[u8]) -> PathBuf {
    let pid = std::process::id();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    for _ in 0..10 {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let filename = format!("{prefix}_{pid}_{counter}_{nanos}.{ext}");
        let path = std::env::temp_dir().join(filename);
        let open_result = OpenOptions::new().write(true).create_new(true).open(&path);

        match open_result {
            Ok(mut file) => {
                file.write_all(contents).unwrap();
                return path;
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => panic!("failed to create temp spec file: {err}"),
        }
    }

    panic!("failed to create a unique temp spec file");
}

#[test]
fn test_load_spec_yaml_and_json() {
    let yaml_path = write_temp_spec("oasmap_spec_yaml", "yaml", YAML_SPEC.as_bytes());
    let ops_yaml = load_spec(yaml_path.to_str().unwrap()).unwrap();

    let spec: OpenApiV3Spec = serde_yaml::from_str(YAML_SPEC).unwrap();
    let json_str = serde_json::to_string(&spec).unwrap();
    let json_path = write_temp_spec("oasmap_spec_json", "json", json_str.as_bytes());
    let ops_json = load_spec(json_path.to_str().unwrap()).unwrap();

    assert_eq!(ops_yaml.len(), 1);
    assert_eq!(ops_json.len(), 1);
    assert_eq!(ops_yaml[0].operation_id, "update_item");
    assert_eq!(ops_yaml[0].method, Method::PUT);

    let _ = std::fs::remove_file(yaml_path);
    let _ = std::fs::remove_file(json_path);
}

#[test]
fn test_parameter_refs_resolved() {
    let spec: OpenApiV3Spec = serde_yaml::from_str(YAML_SPEC).unwrap();
    let ops = load_spec_from_spec(spec).unwrap();
    let op = &ops[0];

    assert_eq!(op.parameters.len(), 2);
    let id = op.parameters.iter().find(|p| p.name == "id").unwrap();
    assert_eq!(id.location, ParameterLocation::Path);
    assert!(id.required);
    assert_eq!(
        id.schema
            .as_ref()
            .and_then(|s| s.get("pattern"))
            .and_then(|v| v.as_str()),
        Some("^[0-9a-fA-F]{24}$")
    );

    let debug = op.parameters.iter().find(|p| p.name == "debug").unwrap();
    assert_eq!(debug.location, ParameterLocation::Query);
    assert!(!debug.required);
}

#[test]
fn test_schema_refs_expanded_with_annotation_marker() {
    let spec: OpenApiV3Spec = serde_yaml::from_str(YAML_SPEC).unwrap();
    let ops = load_spec_from_spec(spec).unwrap();
    let op = &ops[0];

    let request_schema = op.request_schema.as_ref().unwrap();
    assert_eq!(request_schema["x-ref-name"], "Item");
    assert_eq!(request_schema["properties"]["id"]["format"], "ObjectId");
    assert!(op.request_body_required);

    // A response whose root is a $ref keeps the component name too.
    let response_schema = op
        .response_for(200, "application/json")
        .and_then(|r| r.schema.as_ref())
        .unwrap();
    assert_eq!(response_schema["x-ref-name"], "Item");
}

#[test]
fn test_responses_and_default_fallback() {
    let spec: OpenApiV3Spec = serde_yaml::from_str(YAML_SPEC).unwrap();
    let ops = load_spec_from_spec(spec).unwrap();
    let op = &ops[0];

    assert!(op
        .response_for(200, "application/json")
        .unwrap()
        .schema
        .is_some());
    // Undeclared status falls back to the default response.
    let fallback = op.response_for(500, "application/json").unwrap();
    assert!(fallback.schema.is_some());
    assert_eq!(op.content_type_for(200).as_deref(), Some("application/json"));
}
