//! Vector-capable `StorageBackend`: an in-memory record store plus a
//! similarity arena that k-NN search scans once a tier has enough
//! embeddings to make scanning a `DashMap` directly wasteful.

mod arena;
mod backend;
mod metric;

pub use backend::VectorBackend;
pub use metric::{normalize, similarity};
