//! Historical graph reconstruction from temporal events.
//!
//! Reconstructs the causal graph as it existed at any past point in time
//! by replaying RelationshipAdded, RelationshipRemoved, and StrengthUpdated
//! events in event_id order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use cortex_core::models::{CausalEdgeSnapshot, CausalGraphSnapshot, MemoryEvent, MemoryEventType};

use super::stable_graph::{CausalEdgeWeight, IndexedGraph};
use crate::relations::CausalRelation;
use crate::traversal::{TraversalConfig, TraversalEngine, TraversalResult};

/// An intermediate edge representation used during reconstruction.
#[derive(Debug, Clone)]
struct ReconstructedEdge {
    source: String,
    target: String,
    relation_type: String,
    strength: f64,
}

/// Reconstruct the causal graph as it existed at `as_of` from a set of
/// pre-fetched temporal events.
///
/// The caller is responsible for providing all RelationshipAdded,
/// RelationshipRemoved, and StrengthUpdated events with `recorded_at <= as_of`,
/// ordered by `event_id` ascending.
///
/// Algorithm:
/// 1. Process RelationshipAdded events → build edge set
/// 2. Process RelationshipRemoved events → delete edges
/// 3. Process StrengthUpdated events → update strengths (no-op if edge removed)
/// 4. Build IndexedGraph from surviving edges
pub fn reconstruct_graph_at(events: &[MemoryEvent], as_of: DateTime<Utc>) -> IndexedGraph {
    // Edge map keyed by (source, target)
    let mut edges: HashMap<(String, String), ReconstructedEdge> = HashMap::new();

    // Process events in order (caller must provide sorted by event_id)
    for event in events {
        // Skip events after as_of (defensive — caller should pre-filter)
        if event.recorded_at > as_of {
            continue;
        }

        match event.event_type {
            MemoryEventType::RelationshipAdded => {
                let source = event
                    .delta
                    .get("source")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let target = event
                    .delta
                    .get("target")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let relation_type = event
                    .delta
                    .get("relation_type")
                    .and_then(|v| v.as_str())
                    .unwrap_or("supports")
                    .to_string();
                let strength = event
                    .delta
                    .get("strength")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.5);

                if !source.is_empty() && !target.is_empty() {
                    edges.insert(
                        (source.clone(), target.clone()),
                        ReconstructedEdge {
                            source,
                            target,
                            relation_type,
                            strength,
                        },
                    );
                }
            }
            MemoryEventType::RelationshipRemoved => {
                let source = event
                    .delta
                    .get("source")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let target = event
                    .delta
                    .get("target")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();

                if !source.is_empty() && !target.is_empty() {
                    edges.remove(&(source, target));
                }
            }
            MemoryEventType::StrengthUpdated => {
                let source = event
                    .delta
                    .get("source")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let target = event
                    .delta
                    .get("target")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let new_strength = event
                    .delta
                    .get("new_strength")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.5);

                // Only update if edge still exists (removed edges are no-ops)
                if let Some(edge) = edges.get_mut(&(source, target)) {
                    edge.strength = new_strength;
                }
            }
            _ => {
                // Ignore non-relationship events
            }
        }
    }

    // Build IndexedGraph from surviving edges
    build_graph_from_edges(edges)
}

/// Build an IndexedGraph from a map of reconstructed edges.
fn build_graph_from_edges(
    edges: HashMap<(String, String), ReconstructedEdge>,
) -> IndexedGraph {
    let mut graph = IndexedGraph::new();

    for edge in edges.values() {
        let source_idx = graph.ensure_node(&edge.source, "unknown", "");
        let target_idx = graph.ensure_node(&edge.target, "unknown", "");

        let relation =
            CausalRelation::from_str_name(&edge.relation_type).unwrap_or(CausalRelation::Supports);

        let weight = CausalEdgeWeight {
            relation,
            strength: edge.strength,
            evidence: vec![],
            inferred: false,
        };

        graph.graph.add_edge(source_idx, target_idx, weight);
    }

    graph
}

/// Convert an IndexedGraph to a serializable CausalGraphSnapshot.
pub fn graph_to_snapshot(graph: &IndexedGraph) -> CausalGraphSnapshot {
    let nodes: Vec<String> = graph
        .node_index
        .keys()
        .cloned()
        .collect();

    let mut edges = Vec::new();
    for edge_idx in graph.graph.edge_indices() {
        if let (Some(source_idx), Some(target_idx)) = (
            graph.graph.edge_endpoints(edge_idx).map(|(s, _)| s),
            graph.graph.edge_endpoints(edge_idx).map(|(_, t)| t),
        ) {
            if let (Some(source_node), Some(target_node), Some(weight)) = (
                graph.graph.node_weight(source_idx),
                graph.graph.node_weight(target_idx),
                graph.graph.edge_weight(edge_idx),
            ) {
                edges.push(CausalEdgeSnapshot {
                    source: source_node.memory_id.clone(),
                    target: target_node.memory_id.clone(),
                    relation_type: weight.relation.as_str().to_string(),
                    strength: weight.strength,
                });
            }
        }
    }

    CausalGraphSnapshot { nodes, edges }
}

/// Perform a temporal traversal: reconstruct the graph at `as_of`, then
/// run the existing traversal engine on the historical graph.
///
/// This reuses cortex-causal's traversal logic on a reconstructed graph
/// instead of the current live graph.
pub fn temporal_traversal(
    events: &[MemoryEvent],
    memory_id: &str,
    as_of: DateTime<Utc>,
    direction: cortex_core::models::TraversalDirection,
    max_depth: usize,
) -> TraversalResult {
    let graph = reconstruct_graph_at(events, as_of);

    let config = TraversalConfig {
        max_depth,
        min_strength: 0.0, // Include all edges in temporal traversal
        max_nodes: 1000,
    };

    let engine = TraversalEngine::new(config);

    match direction {
        cortex_core::models::TraversalDirection::Forward => engine.trace_effects(&graph, memory_id),
        cortex_core::models::TraversalDirection::Backward => {
            engine.trace_origins(&graph, memory_id)
        }
        cortex_core::models::TraversalDirection::Both => engine.bidirectional(&graph, memory_id),
    }
}
