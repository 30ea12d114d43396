//! # oasmap
//!
//! **oasmap** is an OpenAPI 3.1 driven request/response validation middleware
//! core with a **schema object mapper**: caller-registered (de)serializers
//! for named schema types (`ObjectId`, `Date`, `DateTime`, ...) that coerce
//! validated wire values into rich domain objects before handler execution,
//! and coerce handler-built domain objects back into wire-safe JSON before
//! response validation and encoding.
//!
//! ## Overview
//!
//! The embedding HTTP server owns transport, routing and body parsing; oasmap
//! owns everything between a parsed request and an encoded response body:
//!
//! - **[`spec`]** - OpenAPI 3.1 document loading and operation metadata
//! - **[`schema`]** - borrowed view over resolved schema nodes
//! - **[`mapper`]** - the schema type registry, domain values, and the
//!   bidirectional schema walker
//! - **[`validation`]** - parameter and body validation with deterministic
//!   error messages and a compiled-schema cache
//! - **[`coerce`]** - the request (deserialize) and response (serialize)
//!   coercion stages
//! - **[`config`]** - the configuration surface and its construction guard
//! - **[`logging`]** - `tracing` subscriber setup for embedding applications
//! - **[`pipeline`]** - the per-exchange [`OpenApiValidator`] entry points
//! - **[`request`]** - raw exchange input handed over by the server
//!
//! ### Exchange Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server as HTTP Server<br/>(external)
//!     participant Pipeline as OpenApiValidator
//!     participant Params as validation::params
//!     participant Walker as mapper::walker
//!     participant Handler
//!     participant Body as validation::body
//!
//!     Server->>Pipeline: process_request(op, RequestParts)
//!     Pipeline->>Params: validate each parameter<br/>(type, pattern, enum)
//!     alt Constraint violated
//!         Params-->>Server: 400 request.params.id should match pattern "..."
//!     end
//!     Pipeline->>Body: validate JSON body schema
//!     Pipeline->>Walker: deserialize-coerce validated values
//!     Walker->>Walker: apply mapper entries at<br/>annotated schema nodes
//!     Pipeline-->>Server: CoercedRequest (domain objects)
//!     Server->>Handler: invoke with coerced parameters
//!     Handler-->>Server: FieldValue body (may hold domain objects)
//!     Server->>Pipeline: process_response(op, status, body)
//!     Pipeline->>Walker: serialize-coerce to wire JSON
//!     Pipeline->>Body: validate response schema
//!     alt Contract violated
//!         Body-->>Server: 500 response.body ...
//!     end
//!     Pipeline-->>Server: wire-safe Value to encode
//! ```
//!
//! ### Key Invariants
//!
//! 1. **Mapping never substitutes for validation**: deserialize runs strictly
//!    after request validation passes; serialize runs strictly before
//!    response validation.
//! 2. **Mapper functions never see null/absent values.**
//! 3. **Everything shared is immutable**: the registry and operation metadata
//!    are fixed at construction, so one validator instance serves unlimited
//!    concurrent exchanges without locking; all mutated state is
//!    exchange-local.
//! 4. **Failures are loud**: a mapper error or schema violation surfaces as
//!    an error response, never as a silently passed-through raw value.
//!
//! ## Quick Start
//!
//! ```no_run
//! use oasmap::config::{RequestValidation, ResponseValidation, ValidatorConfig};
//! use oasmap::mapper::{builtin, SchemaObjectMapper};
//! use oasmap::OpenApiValidator;
//!
//! let mapper = SchemaObjectMapper::new()
//!     .entry("ObjectId", builtin::object_id())
//!     .entry("Date", builtin::date())
//!     .entry("DateTime", builtin::date_time());
//!
//! let config = ValidatorConfig::new()
//!     .validate_requests(RequestValidation { coerce_types: true })
//!     .validate_responses(ResponseValidation { coerce_types: true })
//!     .schema_object_mapper(mapper);
//!
//! let validator = OpenApiValidator::from_spec_file("openapi.yaml", config)
//!     .expect("failed to construct validator");
//! // Per exchange: validator.process_request(...) / validator.process_response(...)
//! ```
//!
//! ## Error Taxonomy
//!
//! | Failure | When | Surface |
//! |---|---|---|
//! | Configuration error | construction | mapper without both validation stages; instance never built |
//! | Request validation error | per exchange | 400, `request.<location>.<name> should <constraint>` |
//! | Mapper function error | per exchange | the error's own status, default 500 |
//! | Response validation error | per exchange | 500, server contract violation |
//!
//! All per-exchange errors are local to that exchange; they never touch the
//! registry or other concurrent exchanges.

pub mod coerce;
pub mod config;
pub mod logging;
pub mod mapper;
pub mod pipeline;
pub mod request;
pub mod schema;
pub mod spec;
pub mod validation;

pub use coerce::CoercedRequest;
pub use config::{ConfigError, RequestValidation, ResponseValidation, ValidatorConfig};
pub use mapper::{DomainObject, FieldValue, MapperEntry, MapperError, SchemaObjectMapper};
pub use pipeline::{OpenApiValidator, RequestError, ResponseError};
pub use request::RequestParts;
pub use spec::{load_spec, load_spec_from_spec, OperationMeta, ParameterLocation, ParameterMeta};
pub use validation::{ErrorPayload, ValidationError};
