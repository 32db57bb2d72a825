use std::ops::Range;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::MemoryItem;

/// A metadata-predicate filter for `StorageBackend::search`/`count`.
/// All fields are conjunctive (AND).
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
    pub tags: Vec<String>,
    pub created_range: Option<Range<DateTime<Utc>>>,
    pub full_text: Option<String>,
    pub metadata_eq: Vec<(String, Value)>,
    /// Present when the caller wants vector k-NN in addition to the
    /// predicate filter above; backends without `vector_search` ignore it.
    pub query_embedding: Option<Vec<f32>>,
    pub limit: usize,
}

impl SearchFilter {
    pub fn matches_scope(&self, item: &MemoryItem) -> bool {
        if let Some(t) = &self.tenant_id {
            if item.metadata.tenant_id() != Some(t.as_str()) {
                return false;
            }
        }
        if let Some(u) = &self.user_id {
            if item.metadata.user_id() != Some(u.as_str()) {
                return false;
            }
        }
        if !self.tags.is_empty() {
            let item_tags = item.metadata.tags();
            if !self.tags.iter().all(|t| item_tags.contains(t)) {
                return false;
            }
        }
        if let Some(range) = &self.created_range {
            if !range.contains(&item.created_at) {
                return false;
            }
        }
        for (k, v) in &self.metadata_eq {
            if item.metadata.get(k) != Some(v) {
                return false;
            }
        }
        true
    }
}

/// One result row from `search`: a bounded sequence of `(id, record,
/// score)` tuples.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: Uuid,
    pub item: MemoryItem,
    pub score: f64,
}

/// A partial update applied via compare-and-swap on `version`. The
/// `text`/`summary`/`keywords`/`metadata`/`embedding` fields are the
/// caller-facing surface; the remainder are written by the decay engine,
/// consolidation pipeline, and retrieval's soft-reinforcement-on-read,
/// all of which update records through the same backend-agnostic path.
#[derive(Debug, Clone, Default)]
pub struct MemoryPatch {
    pub text: Option<String>,
    pub summary: Option<Option<String>>,
    pub keywords: Option<Vec<String>>,
    pub metadata: Option<super::Metadata>,
    pub embedding: Option<Option<Vec<f32>>>,
    pub strength: Option<f64>,
    pub reinforcement_level: Option<f64>,
    pub reinforcement_count: Option<u64>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub last_decayed_at: Option<DateTime<Utc>>,
    pub last_reinforced_at: Option<DateTime<Utc>>,
}

/// Merge a patch into an item in place. Every backend applies patches
/// this way so "which fields are nullable-settable vs. skip-if-absent"
/// semantics stay identical regardless of where a record lives. Does
/// not bump `version` — callers own the compare-and-swap bookkeeping.
pub fn apply_patch(item: &mut MemoryItem, patch: MemoryPatch) {
    if let Some(text) = patch.text {
        item.content.text = text;
    }
    if let Some(summary) = patch.summary {
        item.content.summary = summary;
    }
    if let Some(keywords) = patch.keywords {
        item.content.keywords = keywords;
    }
    if let Some(metadata) = patch.metadata {
        item.metadata = metadata;
    }
    if let Some(embedding) = patch.embedding {
        item.embedding = embedding;
    }
    if let Some(strength) = patch.strength {
        item.strength = strength;
    }
    if let Some(level) = patch.reinforcement_level {
        item.reinforcement_level = level;
    }
    if let Some(count) = patch.reinforcement_count {
        item.reinforcement_count = count;
    }
    if let Some(at) = patch.last_accessed_at {
        item.last_accessed_at = at;
    }
    if let Some(at) = patch.last_decayed_at {
        item.last_decayed_at = at;
    }
    if let Some(at) = patch.last_reinforced_at {
        item.last_reinforced_at = at;
    }
}

/// One operation in a `StorageBackend::batch` call.
#[derive(Debug, Clone)]
pub enum BatchOp {
    Create(MemoryItem),
    Update {
        id: Uuid,
        base_version: u64,
        patch: MemoryPatch,
    },
    Delete(Uuid),
}
