mod in_memory;
mod sql;

pub use in_memory::InMemoryBackend;
pub use sql::SqlBackend;
