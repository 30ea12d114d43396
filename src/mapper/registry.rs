use super::entry::MapperEntry;
use std::collections::HashMap;

/// The schema type registry: a lookup from a declared schema type name to its
/// deserialize/serialize pair.
///
/// Supplied wholesale by the caller at configuration time and immutable for
/// the lifetime of the validator instance, so it is safe to share read-only
/// across all concurrent exchanges. Unknown names return `None` and the
/// walker leaves the value untouched.
#[derive(Debug, Default)]
pub struct SchemaObjectMapper {
    entries: HashMap<String, MapperEntry>,
}

impl SchemaObjectMapper {
    pub fn new() -> Self {
        SchemaObjectMapper {
            entries: HashMap::new(),
        }
    }

    /// Register an entry under a type annotation name. Consumes and returns
    /// `self` so registries are assembled in one expression at config time.
    pub fn entry(mut self, name: impl Into<String>, entry: MapperEntry) -> Self {
        self.entries.insert(name.into(), entry);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&MapperEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
