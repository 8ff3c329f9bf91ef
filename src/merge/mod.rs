//! Recursive merging of JSON documents.
//!
//! Standalone utility shipped next to the extractor; the extraction pipeline
//! does not use it.

use serde_json::{Map, Value};

/// Result of folding several JSON documents into one.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedJson {
    /// Merged document; an empty object when nothing could be parsed.
    pub value: Value,
    /// One message per input that failed to parse, in input order.
    pub errors: Vec<String>,
}

impl CombinedJson {
    /// True when every input parsed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Merge `overlay` into `base`.
///
/// - a non-object `overlay` replaces `base` outright
/// - keys only in `overlay` are appended
/// - two objects under the same key are merged recursively
/// - two arrays under the same key are concatenated, `base` items first
/// - any other collision is won by `overlay`
pub fn merge_json_objects(base: Value, overlay: Value) -> Value {
    let Value::Object(overlay) = overlay else {
        return overlay;
    };
    let mut merged = match base {
        Value::Object(base) => base,
        _ => Map::new(),
    };

    // Existing keys are updated in place so they keep their position.
    for (key, incoming) in overlay {
        match merged.get_mut(&key) {
            Some(existing) => {
                let current = existing.take();
                *existing = merge_entry(current, incoming);
            }
            None => {
                merged.insert(key, incoming);
            }
        }
    }

    Value::Object(merged)
}

fn merge_entry(existing: Value, incoming: Value) -> Value {
    match (existing, incoming) {
        (existing @ Value::Object(_), incoming @ Value::Object(_)) => {
            merge_json_objects(existing, incoming)
        }
        (Value::Array(mut existing), Value::Array(incoming)) => {
            existing.extend(incoming);
            Value::Array(existing)
        }
        (_, incoming) => incoming,
    }
}

/// Parse each input and merge them left to right into an empty object.
///
/// Inputs that are not valid JSON are skipped and recorded in
/// [`CombinedJson::errors`].
pub fn combine_json_strings<I, S>(inputs: I) -> CombinedJson
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut value = Value::Object(Map::new());
    let mut errors = Vec::new();

    for input in inputs {
        match serde_json::from_str::<Value>(input.as_ref()) {
            Ok(document) => value = merge_json_objects(value, document),
            Err(e) => {
                tracing::debug!(target: "sql2conds::merge", error = %e, "skipping input");
                errors.push(format!("Error parsing JSON: {e}"));
            }
        }
    }

    CombinedJson { value, errors }
}
