//! `StorageBackend` implementations: a volatile in-memory store for STM,
//! and an embedded SQLite store for MTM/LTM. Both share the CRUD/batch
//! semantics, search scan, and `MemoryPatch` application logic defined
//! here so a caller can swap backends without its behavior changing.

pub mod backends;
mod lexical;
mod patch;
pub mod queries;

pub mod migrations;

pub use backends::{InMemoryBackend, SqlBackend};
