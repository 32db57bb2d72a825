//! Knowledge-graph `StorageBackend`: an LTM record store plus a
//! `petgraph`-backed adjacency index for typed relationships between
//! memories. No acyclicity is enforced — relationships are not
//! guaranteed to form a DAG.

mod backend;
mod indexed_graph;

pub use backend::GraphBackend;
