//! Compiled JSON Schema cache for body validation.
//!
//! JSON Schema validators are expensive to compile, so they are compiled once
//! per operation/kind/status and shared across exchanges behind `Arc`. The
//! operation metadata they are compiled from is immutable after load, so no
//! invalidation is needed.

use jsonschema::Validator;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info};

/// Thread-safe cache of compiled schema validators.
///
/// Keys are `{operation_id}:{kind}:{status}`; values are `Arc`-shared
/// compiled schemas. Multiple exchanges can read concurrently; a miss takes
/// the write lock once to insert.
#[derive(Clone)]
pub struct ValidatorCache {
    cache: Arc<RwLock<HashMap<String, Arc<Validator>>>>,
    enabled: bool,
}

impl ValidatorCache {
    pub fn new(enabled: bool) -> Self {
        info!(enabled = enabled, "Initializing JSON Schema validator cache");
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            enabled,
        }
    }

    fn cache_key(operation_id: &str, kind: &str, status: Option<u16>) -> String {
        match status {
            Some(s) => format!("{operation_id}:{kind}:{s}"),
            None => format!("{operation_id}:{kind}"),
        }
    }

    /// Get a cached validator or compile and cache a new one.
    ///
    /// Returns `None` if the schema fails to compile.
    pub fn get_or_compile(
        &self,
        operation_id: &str,
        kind: &str,
        status: Option<u16>,
        schema: &Value,
    ) -> Option<Arc<Validator>> {
        if !self.enabled {
            return jsonschema::validator_for(schema).map(Arc::new).ok();
        }

        let key = Self::cache_key(operation_id, kind, status);

        {
            #[allow(clippy::expect_used)]
            let cache = self.cache.read().expect("validator cache lock poisoned");
            if let Some(validator) = cache.get(&key) {
                debug!(
                    operation_id = operation_id,
                    kind = kind,
                    status = status,
                    cache_key = %key,
                    "Schema validator cache hit"
                );
                return Some(Arc::clone(validator));
            }
        }

        match jsonschema::validator_for(schema) {
            Ok(compiled) => {
                let validator = Arc::new(compiled);
                #[allow(clippy::expect_used)]
                let mut cache = self.cache.write().expect("validator cache lock poisoned");
                // Another exchange may have compiled while we waited.
                if let Some(existing) = cache.get(&key) {
                    return Some(Arc::clone(existing));
                }
                cache.insert(key.clone(), Arc::clone(&validator));
                debug!(
                    operation_id = operation_id,
                    kind = kind,
                    status = status,
                    cache_key = %key,
                    cache_size = cache.len(),
                    "Schema validator compiled and cached"
                );
                Some(validator)
            }
            Err(e) => {
                error!(
                    operation_id = operation_id,
                    kind = kind,
                    status = status,
                    error = %e,
                    "Failed to compile JSON Schema"
                );
                None
            }
        }
    }

    /// Validate a value, returning every violation's message text.
    pub fn validate(
        &self,
        operation_id: &str,
        kind: &str,
        status: Option<u16>,
        schema: &Value,
        value: &Value,
    ) -> Result<(), Vec<String>> {
        let compiled = match self.get_or_compile(operation_id, kind, status, schema) {
            Some(c) => c,
            None => return Err(vec!["schema failed to compile".to_string()]),
        };
        let errors: Vec<String> = compiled.iter_errors(value).map(|e| e.to_string()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn size(&self) -> usize {
        #[allow(clippy::expect_used)]
        let cache = self.cache.read().expect("validator cache lock poisoned");
        cache.len()
    }
}

impl std::fmt::Debug for ValidatorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorCache")
            .field("enabled", &self.enabled)
            .field("size", &self.size())
            .finish()
    }
}

impl Default for ValidatorCache {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_compiles_once() {
        let cache = ValidatorCache::default();
        let schema = json!({ "type": "object", "properties": { "id": { "type": "string" } } });
        assert!(cache.get_or_compile("get_user", "request", None, &schema).is_some());
        assert!(cache.get_or_compile("get_user", "request", None, &schema).is_some());
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_validate_reports_violations() {
        let cache = ValidatorCache::default();
        let schema = json!({ "type": "object", "required": ["id"] });
        assert!(cache.validate("op", "request", None, &schema, &json!({ "id": "x" })).is_ok());
        let errs = cache
            .validate("op", "request", None, &schema, &json!({}))
            .unwrap_err();
        assert!(!errs.is_empty());
    }

    #[test]
    fn test_disabled_cache_still_validates() {
        let cache = ValidatorCache::new(false);
        let schema = json!({ "type": "string" });
        assert!(cache.validate("op", "response", Some(200), &schema, &json!("ok")).is_ok());
        assert_eq!(cache.size(), 0);
    }
}
