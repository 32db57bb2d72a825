//! Minimal lexical scorer used by backends with no full-text index
//! (the in-memory backend, and the SQL backend's fallback scan).

use std::collections::HashSet;

fn tokenize(s: &str) -> HashSet<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Jaccard overlap between the query's tokens and the document's tokens,
/// in `[0, 1]`. Not a substitute for a real inverted index, but enough to
/// rank candidates consistently for tiers that never grow large.
pub fn lexical_score(query: &str, document: &str) -> f64 {
    let q = tokenize(query);
    if q.is_empty() {
        return 0.0;
    }
    let d = tokenize(document);
    if d.is_empty() {
        return 0.0;
    }
    let overlap = q.intersection(&d).count();
    let union = q.union(&d).count();
    if union == 0 {
        0.0
    } else {
        overlap as f64 / union as f64
    }
}
