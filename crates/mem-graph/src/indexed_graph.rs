use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction as PetDirection;
use uuid::Uuid;

use mem_core::model::{Direction, Relationship};

/// A `petgraph::StableDiGraph` keyed by memory id. Node weights are the
/// id itself (so an edge lookup never needs a second hashmap round
/// trip); edge weights are the relationship payload.
///
/// No acyclicity is enforced here — relationships between memories are
/// not guaranteed to form a DAG.
pub struct IndexedGraph {
    graph: StableDiGraph<Uuid, Relationship>,
    index: HashMap<Uuid, NodeIndex>,
}

impl IndexedGraph {
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    fn ensure_node(&mut self, id: Uuid) -> NodeIndex {
        *self.index.entry(id).or_insert_with(|| self.graph.add_node(id))
    }

    pub fn add_edge(&mut self, rel: Relationship) {
        let from = self.ensure_node(rel.from);
        let to = self.ensure_node(rel.to);
        self.graph.add_edge(from, to, rel);
    }

    /// Remove every edge directed `from -> to`, regardless of `rel_type`.
    /// Returns whether anything was removed.
    pub fn remove_edge(&mut self, from: Uuid, to: Uuid) -> bool {
        let (Some(&from_idx), Some(&to_idx)) = (self.index.get(&from), self.index.get(&to)) else {
            return false;
        };
        let mut removed = false;
        while let Some(edge_idx) = self.graph.find_edge(from_idx, to_idx) {
            self.graph.remove_edge(edge_idx);
            removed = true;
        }
        removed
    }

    pub fn get_edges(&self, id: Uuid, direction: Direction, rel_type: Option<&str>) -> Vec<Relationship> {
        let Some(&idx) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if matches!(direction, Direction::Out | Direction::Any) {
            for neighbor in self.graph.neighbors_directed(idx, PetDirection::Outgoing) {
                for edge_idx in self.edges_between(idx, neighbor) {
                    if let Some(rel) = self.graph.edge_weight(edge_idx) {
                        if rel_type.is_none_or_eq(&rel.rel_type) {
                            out.push(rel.clone());
                        }
                    }
                }
            }
        }
        if matches!(direction, Direction::In | Direction::Any) {
            for neighbor in self.graph.neighbors_directed(idx, PetDirection::Incoming) {
                for edge_idx in self.edges_between(neighbor, idx) {
                    if let Some(rel) = self.graph.edge_weight(edge_idx) {
                        if rel_type.is_none_or_eq(&rel.rel_type) {
                            out.push(rel.clone());
                        }
                    }
                }
            }
        }
        out
    }

    fn edges_between(&self, a: NodeIndex, b: NodeIndex) -> Vec<petgraph::stable_graph::EdgeIndex> {
        self.graph.edges_connecting(a, b).map(|e| e.id()).collect()
    }

    /// Bounded breadth-first traversal from `id`, following outgoing
    /// edges only, out to `depth` hops. `id` itself is not included.
    pub fn neighbors(&self, id: Uuid, depth: usize) -> Vec<Uuid> {
        let Some(&start) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut seen = std::collections::HashSet::new();
        let mut frontier = vec![start];
        let mut out = Vec::new();
        for _ in 0..depth {
            let mut next = Vec::new();
            for idx in frontier {
                for neighbor in self.graph.neighbors_directed(idx, PetDirection::Outgoing) {
                    if seen.insert(neighbor) {
                        if let Some(&uuid) = self.graph.node_weight(neighbor) {
                            out.push(uuid);
                        }
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        out
    }

    /// Remove every edge touching `id`, in either direction, and drop
    /// the node itself. Returns the number of edges removed.
    pub fn remove_all_for(&mut self, id: Uuid) -> usize {
        let Some(idx) = self.index.remove(&id) else {
            return 0;
        };
        let incident: Vec<_> = self
            .graph
            .edges_directed(idx, PetDirection::Outgoing)
            .chain(self.graph.edges_directed(idx, PetDirection::Incoming))
            .map(|e| e.id())
            .collect();
        let count = incident.len();
        for edge_idx in incident {
            self.graph.remove_edge(edge_idx);
        }
        self.graph.remove_node(idx);
        count
    }

    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for IndexedGraph {
    fn default() -> Self {
        Self::new()
    }
}

trait OptStrEq {
    fn is_none_or_eq(&self, other: &str) -> bool;
}

impl OptStrEq for Option<&str> {
    fn is_none_or_eq(&self, other: &str) -> bool {
        match self {
            None => true,
            Some(s) => *s == other,
        }
    }
}
