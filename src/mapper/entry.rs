use super::value::DomainObject;
use serde_json::Value;

/// Failure raised by a mapper's deserialize or serialize function.
///
/// Propagates as a processing error for the current exchange with the status
/// code the function chose (default 500); it never affects the registry or
/// other exchanges.
#[derive(Debug, Clone)]
pub struct MapperError {
    pub message: String,
    pub code: u16,
}

impl MapperError {
    pub fn new(message: impl Into<String>) -> Self {
        MapperError {
            message: message.into(),
            code: 500,
        }
    }

    pub fn with_code(message: impl Into<String>, code: u16) -> Self {
        MapperError {
            message: message.into(),
            code,
        }
    }
}

impl std::fmt::Display for MapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for MapperError {}

type DeserializeFn = Box<dyn Fn(&Value) -> Result<DomainObject, MapperError> + Send + Sync>;
type SerializeFn = Box<dyn Fn(&DomainObject) -> Result<Value, MapperError> + Send + Sync>;

/// A named pair of pure conversion functions bound to a schema type
/// annotation.
///
/// `deserialize` turns a validated wire primitive into a domain object;
/// `serialize` turns a domain object back into its canonical wire form. Both
/// must be synchronous and side-effect-free with respect to shared state.
pub struct MapperEntry {
    deserialize: DeserializeFn,
    serialize: SerializeFn,
}

impl MapperEntry {
    pub fn new<D, S>(deserialize: D, serialize: S) -> Self
    where
        D: Fn(&Value) -> Result<DomainObject, MapperError> + Send + Sync + 'static,
        S: Fn(&DomainObject) -> Result<Value, MapperError> + Send + Sync + 'static,
    {
        MapperEntry {
            deserialize: Box::new(deserialize),
            serialize: Box::new(serialize),
        }
    }

    pub fn deserialize(&self, value: &Value) -> Result<DomainObject, MapperError> {
        (self.deserialize)(value)
    }

    pub fn serialize(&self, object: &DomainObject) -> Result<Value, MapperError> {
        (self.serialize)(object)
    }
}

impl std::fmt::Debug for MapperEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MapperEntry")
    }
}
