use chrono::{DateTime, TimeZone, Utc};

use mem_core::model::{Content, MemoryItem, Metadata, Tier};

/// A fixed instant for tests that need a stable "now" independent of
/// wall-clock skew between assertions.
pub fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// A plain memory item in `tier` with the given text and default
/// metadata.
pub fn memory_in(tier: Tier, text: &str) -> MemoryItem {
    MemoryItem::new(Content::new(text), Metadata::new(), tier)
}

/// A memory item with importance set, for promotion/decay-eligibility
/// tests that key off it.
pub fn memory_with_importance(tier: Tier, text: &str, importance: f64) -> MemoryItem {
    let mut metadata = Metadata::new();
    metadata.set_importance(importance);
    MemoryItem::new(Content::new(text), metadata, tier)
}
