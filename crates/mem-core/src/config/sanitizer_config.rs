use serde::{Deserialize, Serialize};

/// Sanitizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Regex patterns matched against content to redact secrets.
    pub secret_patterns: Vec<String>,
    pub max_content_bytes: usize,
    /// Heuristic threshold (characters of instruction-like text) above
    /// which content is suspected of prompt injection.
    pub injection_heuristic_threshold: usize,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            secret_patterns: vec![
                r"-----BEGIN [A-Z ]+PRIVATE KEY-----".to_string(),
                r"sk-[A-Za-z0-9]{20,}".to_string(),
                r"(?i)bearer\s+[a-z0-9._-]{20,}".to_string(),
            ],
            max_content_bytes: 64 * 1024,
            injection_heuristic_threshold: 2000,
        }
    }
}
