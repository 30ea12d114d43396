#![allow(clippy::unwrap_used, clippy::expect_used)]

use http::Method;
use oasmap::config::{RequestValidation, ResponseValidation, ValidatorConfig};
use oasmap::{FieldValue, OpenApiValidator, RequestParts};
use serde_json::json;

const ITEMS_SPEC: &str = r#"openapi: 3.1.0
info:
  title: Items API
  version: "1.0.0"
components:
  schemas:
    Item:
      type: object
      required: [name]
      properties:
        name: { type: string }
        quantity: { type: integer }
paths:
  /items:
    post:
      operationId: create_item
      parameters:
        - name: limit
          in: query
          required: false
          schema: { type: integer }
        - name: kind
          in: query
          required: false
          schema:
            type: string
            enum: [widget, gadget]
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Item'
      responses:
        "201":
          description: Created
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Item'
"#;

fn validator() -> OpenApiValidator {
    let spec: oas3::OpenApiV3Spec = serde_yaml::from_str(ITEMS_SPEC).unwrap();
    let operations = oasmap::load_spec_from_spec(spec).unwrap();
    OpenApiValidator::new(
        operations,
        ValidatorConfig::new()
            .validate_requests(RequestValidation { coerce_types: true })
            .validate_responses(ResponseValidation { coerce_types: true }),
    )
    .unwrap()
}

#[test]
fn test_required_body_enforced() {
    let v = validator();
    let op = v.operation("create_item").unwrap();
    let parts = RequestParts::new(Method::POST, "/items");
    let err = v.process_request(op, &parts).unwrap_err();
    assert_eq!(err.code(), 400);
    assert_eq!(err.payload().message, "request.body should be present");
}

#[test]
fn test_body_schema_violation() {
    let v = validator();
    let op = v.operation("create_item").unwrap();
    let parts = RequestParts::new(Method::POST, "/items").body(json!({ "quantity": 3 }));
    let err = v.process_request(op, &parts).unwrap_err();
    assert_eq!(err.code(), 400);
    assert!(err.payload().message.starts_with("request.body"));
}

#[test]
fn test_valid_body_and_coerced_query() {
    let v = validator();
    let op = v.operation("create_item").unwrap();
    let parts = RequestParts::new(Method::POST, "/items")
        .query_param("limit", "10")
        .body(json!({ "name": "bolt", "quantity": 3 }));
    let coerced = v.process_request(op, &parts).unwrap();

    assert_eq!(coerced.query_params["limit"].as_json(), Some(&json!(10)));
    assert_eq!(
        coerced.body.as_ref().and_then(|b| b.as_json()),
        Some(&json!({ "name": "bolt", "quantity": 3 }))
    );
}

#[test]
fn test_enum_violation_message() {
    let v = validator();
    let op = v.operation("create_item").unwrap();
    let parts = RequestParts::new(Method::POST, "/items")
        .query_param("kind", "sprocket")
        .body(json!({ "name": "bolt" }));
    let err = v.process_request(op, &parts).unwrap_err();
    assert_eq!(
        err.payload().message,
        "request.query.kind should be equal to one of the allowed values"
    );
}

#[test]
fn test_type_violation_message() {
    let v = validator();
    let op = v.operation("create_item").unwrap();
    let parts = RequestParts::new(Method::POST, "/items")
        .query_param("limit", "many")
        .body(json!({ "name": "bolt" }));
    let err = v.process_request(op, &parts).unwrap_err();
    assert_eq!(err.payload().message, "request.query.limit should be integer");
}

#[test]
fn test_undeclared_query_param_passes_through() {
    let v = validator();
    let op = v.operation("create_item").unwrap();
    let parts = RequestParts::new(Method::POST, "/items")
        .query_param("trace", "on")
        .body(json!({ "name": "bolt" }));
    let coerced = v.process_request(op, &parts).unwrap();
    assert_eq!(coerced.query_params["trace"].as_str(), Some("on"));
}

#[test]
fn test_response_validated_against_schema() {
    let v = validator();
    let op = v.operation("create_item").unwrap();

    let ok = v.process_response(op, 201, FieldValue::Json(json!({ "name": "bolt" })));
    assert_eq!(ok.unwrap(), json!({ "name": "bolt" }));

    let err = v
        .process_response(op, 201, FieldValue::Json(json!({ "quantity": 1 })))
        .unwrap_err();
    assert_eq!(err.code(), 500);
}
