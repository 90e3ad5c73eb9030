//! Field access on raw corpus records (`serde_json::Value`), shared by the filter
//! and the topic tally. Comments, submissions and conversations differ in shape;
//! conversations nest their messages, so text is gathered recursively.

use serde_json::Value;

/// Fields that carry free text across the three corpora.
const TEXT_FIELDS: [&str; 4] = ["title", "selftext", "body", "text"];
const MAX_DEPTH: usize = 8;

/// Raw `subreddit` string, if present and a string.
pub fn subreddit(v: &Value) -> Option<&str> {
    v.get("subreddit").and_then(|x| x.as_str())
}

/// Lowercased text of a record: every text field, at any nesting depth up to
/// `MAX_DEPTH`, joined by single spaces. Empty when the record has no text.
pub fn text_lower(v: &Value) -> String {
    let mut hay = String::new();
    collect_text(v, 0, &mut hay);
    hay
}

fn collect_text(v: &Value, depth: usize, hay: &mut String) {
    if depth > MAX_DEPTH {
        return;
    }
    match v {
        Value::Object(map) => {
            for key in TEXT_FIELDS {
                if let Some(s) = map.get(key).and_then(|x| x.as_str()) {
                    if s.is_empty() { continue; }
                    if !hay.is_empty() { hay.push(' '); }
                    hay.push_str(&s.to_lowercase());
                }
            }
            // containers recurse under any key, text fields included
            for child in map.values() {
                if child.is_object() || child.is_array() {
                    collect_text(child, depth + 1, hay);
                }
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_text(child, depth + 1, hay);
            }
        }
        _ => {}
    }
}

/// Unix seconds from `timestamp` or `created_utc`, given as a number or a
/// numeric string.
pub fn timestamp_secs(v: &Value) -> Option<i64> {
    ["timestamp", "created_utc"].iter().find_map(|k| match v.get(*k)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    })
}
