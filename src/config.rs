//! Validator configuration and the construction-time guard.
//!
//! Configuration is explicit caller-supplied data: no environment lookups and
//! no hidden globals. The guard rejects a schema object mapper supplied
//! without both validation stages enabled, because the mapper's coercion
//! stages hook into the validation pipeline's pre/post steps and have no
//! defined behavior without them.

use crate::mapper::SchemaObjectMapper;
use serde::{Deserialize, Serialize};

/// Options for the request validation stage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RequestValidation {
    /// Convert raw string parameters to their schema-declared primitive types.
    #[serde(default)]
    pub coerce_types: bool,
}

/// Options for the response validation stage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResponseValidation {
    #[serde(default)]
    pub coerce_types: bool,
}

/// Configuration surface consumed at validator construction.
#[derive(Debug, Default)]
pub struct ValidatorConfig {
    pub validate_requests: Option<RequestValidation>,
    pub validate_responses: Option<ResponseValidation>,
    pub schema_object_mapper: Option<SchemaObjectMapper>,
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_requests(mut self, opts: RequestValidation) -> Self {
        self.validate_requests = Some(opts);
        self
    }

    pub fn validate_responses(mut self, opts: ResponseValidation) -> Self {
        self.validate_responses = Some(opts);
        self
    }

    pub fn schema_object_mapper(mut self, mapper: SchemaObjectMapper) -> Self {
        self.schema_object_mapper = Some(mapper);
        self
    }

    /// The configuration guard: a mapper without both validation stages
    /// explicitly enabled is a fatal configuration error.
    pub fn guard(&self) -> Result<(), ConfigError> {
        if self.schema_object_mapper.is_some()
            && (self.validate_requests.is_none() || self.validate_responses.is_none())
        {
            return Err(ConfigError::MapperRequiresValidation);
        }
        Ok(())
    }
}

/// Fatal configuration error raised at construction; no partially-configured
/// validator instance serves traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MapperRequiresValidation,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MapperRequiresValidation => f.write_str(
                "schemaObjectMapper requires both validateRequests and validateResponses to be enabled",
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
