use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A type-erased domain value produced by a mapper entry's deserialize
/// function.
///
/// Handlers downcast to the concrete type they expect; the response coercion
/// stage hands the object back to the matching serialize function. Cloning is
/// cheap; the payload is shared behind an `Arc`.
#[derive(Clone)]
pub struct DomainObject {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl DomainObject {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        DomainObject {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Rust type name of the wrapped value, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl std::fmt::Debug for DomainObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DomainObject<{}>", self.type_name)
    }
}

/// The coerced value tree seen by handlers.
///
/// Request coercion produces one of these per validated parameter and body;
/// handlers build one for the response body. `Json` leaves carry wire-format
/// primitives (or whole untouched subtrees); `Domain` leaves carry mapped
/// runtime objects.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Json(Value),
    Domain(DomainObject),
    Array(Vec<FieldValue>),
    Object(HashMap<String, FieldValue>),
}

impl FieldValue {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FieldValue::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_domain(&self) -> Option<&DomainObject> {
        match self {
            FieldValue::Domain(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Json(Value::Null))
    }

    /// Convert a pure-JSON tree back to a `Value`.
    ///
    /// Returns `None` if any `Domain` leaf remains: a domain object has no
    /// generic JSON encoding and must go through its serialize function.
    pub fn into_json(self) -> Option<Value> {
        match self {
            FieldValue::Json(v) => Some(v),
            FieldValue::Domain(_) => None,
            FieldValue::Array(items) => items
                .into_iter()
                .map(FieldValue::into_json)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            FieldValue::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k, v.into_json()?);
                }
                Some(Value::Object(out))
            }
        }
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Json(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_domain_downcast() {
        let obj = DomainObject::new(42u32);
        assert_eq!(obj.downcast_ref::<u32>(), Some(&42));
        assert!(obj.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_into_json_pure_tree() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), FieldValue::Json(json!(1)));
        map.insert(
            "b".to_string(),
            FieldValue::Array(vec![FieldValue::Json(json!("x"))]),
        );
        let value = FieldValue::Object(map).into_json().expect("pure tree");
        assert_eq!(value, json!({ "a": 1, "b": ["x"] }));
    }

    #[test]
    fn test_into_json_rejects_domain_leaf() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), FieldValue::Domain(DomainObject::new(1u8)));
        assert!(FieldValue::Object(map).into_json().is_none());
    }
}
