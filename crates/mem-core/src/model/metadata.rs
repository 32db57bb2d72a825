use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved metadata keys with typed meaning. Every other key is opaque
/// JSON the engine passes through unexamined.
pub const KEY_TENANT_ID: &str = "tenant_id";
pub const KEY_USER_ID: &str = "user_id";
pub const KEY_IMPORTANCE: &str = "importance";
pub const KEY_TAGS: &str = "tags";
pub const KEY_SOURCE: &str = "source";

/// Open mapping of string to value, with typed accessors for the reserved
/// keys. Unreserved keys are caller-defined "custom" fields, stored
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.0.get(KEY_TENANT_ID).and_then(Value::as_str)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.0.get(KEY_USER_ID).and_then(Value::as_str)
    }

    /// Importance in `[0, 1]`. Defaults to 0.5 when absent or malformed.
    pub fn importance(&self) -> f64 {
        self.0
            .get(KEY_IMPORTANCE)
            .and_then(Value::as_f64)
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(0.5)
    }

    pub fn set_importance(&mut self, importance: f64) {
        self.insert(KEY_IMPORTANCE, serde_json::json!(importance.clamp(0.0, 1.0)));
    }

    /// Normalized tag set: lowercased, trimmed, de-duplicated. Sanitizer
    /// (mem-guard) is responsible for actually normalizing on write; this
    /// accessor just reads whatever is currently stored.
    pub fn tags(&self) -> Vec<String> {
        self.0
            .get(KEY_TAGS)
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.insert(KEY_TAGS, serde_json::json!(tags));
    }

    pub fn source(&self) -> Option<&str> {
        self.0.get(KEY_SOURCE).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}
