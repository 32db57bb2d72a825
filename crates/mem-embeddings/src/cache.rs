/// Content-addressed key into the embedding cache: a `blake3` hash of
/// the normalized input text, so identical content always maps to the
/// same cache slot regardless of when or how many times it is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn of(text: &str) -> Self {
        Self(*blake3::hash(normalize(text).as_bytes()).as_bytes())
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_string()
}
