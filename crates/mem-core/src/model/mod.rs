mod events;
mod memory_item;
mod metadata;
mod query;
mod relationship;
mod tier;

pub use events::{AuditEvent, AuditRecord, MetricSample};
pub use memory_item::{Content, MemoryItem};
pub use metadata::{Metadata, KEY_IMPORTANCE, KEY_SOURCE, KEY_TAGS, KEY_TENANT_ID, KEY_USER_ID};
pub use query::{apply_patch, BatchOp, MemoryPatch, SearchFilter, SearchHit};
pub use relationship::{Direction, Relationship};
pub use tier::Tier;
