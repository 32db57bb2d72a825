use std::collections::HashSet;

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1)
        .map(|w| w.to_lowercase())
        .collect()
}

/// Query-recall overlap: the fraction of the query's distinct terms that
/// also appear in `text`. `0.0` when the query has no terms or none
/// match; `1.0` when every query term is present.
pub fn lexical_score(query: &str, text: &str) -> f64 {
    let query_terms = tokenize(query);
    if query_terms.is_empty() {
        return 0.0;
    }
    let text_terms = tokenize(text);
    let hits = query_terms.intersection(&text_terms).count();
    hits as f64 / query_terms.len() as f64
}
