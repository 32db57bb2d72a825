use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A directed, typed edge between two memory ids, LTM-only. The
/// knowledge-graph backend guarantees this is indexed from both
/// endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: Uuid,
    pub to: Uuid,
    pub rel_type: String,
    pub weight: Option<f64>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

impl Relationship {
    pub fn new(from: Uuid, to: Uuid, rel_type: impl Into<String>) -> Self {
        Self {
            from,
            to,
            rel_type: rel_type.into(),
            weight: None,
            metadata: Value::Null,
            created_at: Utc::now(),
        }
    }
}

/// Which side(s) of an edge to traverse from a given node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    Any,
}
