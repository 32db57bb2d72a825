use std::collections::HashMap;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "of", "to", "in", "on", "for", "with", "is", "are",
    "was", "were", "it", "this", "that", "as", "at", "by", "be", "has", "have", "had",
];

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1)
        .map(|w| w.to_lowercase())
        .collect()
}

fn term_frequencies(text: &str) -> HashMap<String, usize> {
    let mut freq = HashMap::new();
    for w in words(text) {
        if STOPWORDS.contains(&w.as_str()) {
            continue;
        }
        *freq.entry(w).or_insert(0) += 1;
    }
    freq
}

fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Weighted sentence selection: each sentence scores by the average
/// term frequency of its (non-stopword) words; the top-scoring
/// sentences are kept, in their original order, up to `max_sentences`.
pub fn summarize(text: &str, max_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= max_sentences {
        return sentences.join(". ");
    }

    let freq = term_frequencies(text);
    let mut scored: Vec<(usize, &str, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let ws = words(s);
            let score = if ws.is_empty() {
                0.0
            } else {
                ws.iter().map(|w| *freq.get(w).unwrap_or(&0) as f64).sum::<f64>() / ws.len() as f64
            };
            (i, *s, score)
        })
        .collect();

    scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
    let mut top: Vec<(usize, &str)> = scored.into_iter().take(max_sentences).map(|(i, s, _)| (i, s)).collect();
    top.sort_by_key(|(i, _)| *i);
    top.into_iter().map(|(_, s)| s).collect::<Vec<_>>().join(". ")
}

/// Keyword extraction: term frequency weighted by the item's importance,
/// top `max_keywords` by combined score.
pub fn keywords(text: &str, importance: f64, max_keywords: usize) -> Vec<String> {
    let freq = term_frequencies(text);
    let mut scored: Vec<(String, f64)> = freq
        .into_iter()
        .map(|(word, count)| (word, count as f64 * importance.max(0.01)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
    scored.into_iter().take(max_keywords).map(|(w, _)| w).collect()
}
