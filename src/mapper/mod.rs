pub mod builtin;
mod entry;
mod registry;
mod value;
mod walker;

pub use entry::{MapperEntry, MapperError};
pub use registry::SchemaObjectMapper;
pub use value::{DomainObject, FieldValue};
pub use walker::{deserialize_value, serialize_value};
