/// Declares which optional operations a [`crate::traits::StorageBackend`]
/// implements. Modeled as a capability-descriptor struct rather than
/// deep trait inheritance, so a backend can add optional operations
/// without forcing every other backend to stub them out. Callers check
/// the relevant flag before invoking an optional operation and get
/// `Unsupported` back if they don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub kv_crud: bool,
    pub batch: bool,
    pub metadata_filter: bool,
    pub vector_search: bool,
    pub relationship_store: bool,
    pub ttl: bool,
}

impl Capabilities {
    pub const fn in_memory() -> Self {
        Self {
            kv_crud: true,
            batch: true,
            metadata_filter: true,
            vector_search: false,
            relationship_store: false,
            ttl: true,
        }
    }

    pub const fn embedded_sql() -> Self {
        Self {
            kv_crud: true,
            batch: true,
            metadata_filter: true,
            vector_search: false,
            relationship_store: false,
            ttl: true,
        }
    }

    pub const fn vector() -> Self {
        Self {
            kv_crud: true,
            batch: true,
            metadata_filter: true,
            vector_search: true,
            relationship_store: false,
            ttl: false,
        }
    }

    pub const fn knowledge_graph() -> Self {
        Self {
            kv_crud: true,
            batch: true,
            metadata_filter: true,
            vector_search: true,
            relationship_store: true,
            ttl: false,
        }
    }
}
