use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Metadata, Tier};

/// Textual payload plus the optional structured fields required once an
/// item reaches LTM (summary and keywords become mandatory there).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub text: String,
    pub summary: Option<String>,
    pub keywords: Vec<String>,
    pub source: Option<String>,
}

impl Content {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            summary: None,
            keywords: Vec::new(),
            source: None,
        }
    }
}

/// The atomic unit of the engine. Clamped/monotonic invariants
/// (`strength` bounds, `version` monotonicity, `id` immutability) are
/// enforced by the tier/backend layer that mutates instances of this
/// struct, not by the struct itself — it is a plain data carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryItem {
    pub id: Uuid,
    pub content: Content,
    pub metadata: Metadata,
    pub embedding: Option<Vec<f32>>,
    pub tier: Tier,
    pub strength: f64,
    pub importance: f64,
    pub reinforcement_level: f64,
    pub reinforcement_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub last_decayed_at: DateTime<Utc>,
    pub last_reinforced_at: DateTime<Utc>,
    pub version: u64,
}

impl MemoryItem {
    /// Construct a freshly-created item. `strength` starts at the
    /// importance-weighted baseline so a brand-new high-importance item
    /// does not start cold.
    pub fn new(content: Content, metadata: Metadata, tier: Tier) -> Self {
        let now = Utc::now();
        let importance = metadata.importance();
        Self {
            id: Uuid::new_v4(),
            content,
            metadata,
            embedding: None,
            tier,
            strength: importance.clamp(0.0, 1.0),
            importance,
            reinforcement_level: 0.0,
            reinforcement_count: 0,
            created_at: now,
            last_accessed_at: now,
            last_decayed_at: now,
            last_reinforced_at: now,
            version: 1,
        }
    }

    /// Refresh `last_accessed_at` for a successful caller-visible read.
    /// The new timestamp must be >= whatever clock read preceded the call.
    pub fn mark_accessed(&mut self, at: DateTime<Utc>) {
        self.last_accessed_at = at;
    }

    pub fn clamp_strength(&mut self, min_strength: f64, max_strength: f64) {
        self.strength = self.strength.clamp(min_strength, max_strength);
    }
}
