//! Structured-field extraction from free text.
//!
//! Model replies are asked to carry lines such as `TARGET: Alice`. This
//! module pulls those fields out; everything downstream consumes typed
//! values and never parses text itself.

use tracing::{instrument, trace};

fn strip_decoration(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '#' | '>' | '_' | '`') || c.is_whitespace())
}

/// Returns the trimmed rest of the first line starting with `key:`
/// (case-insensitive), or an empty string if no line carries the key.
///
/// Leading list or emphasis markers are ignored, so `**Vote:** Bob` and
/// `- VOTE: Bob` both yield `Bob`.
#[instrument(skip(text), fields(len = text.len()))]
pub fn extract_field(text: &str, key: &str) -> String {
    let key = key.trim().to_lowercase();
    for line in text.lines() {
        let line = strip_decoration(line);
        let Some(head) = line.get(..key.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(&key) {
            continue;
        }
        let rest = line[key.len()..].trim_start_matches(|c: char| matches!(c, '*' | '_'));
        let Some(value) = rest.trim_start().strip_prefix(':') else {
            continue;
        };
        let value = value
            .trim()
            .trim_start_matches(|c: char| matches!(c, '*' | '_'))
            .trim_end_matches(|c: char| matches!(c, '*' | '_'))
            .trim();
        trace!(key = %key, value, "Field extracted");
        return value.to_string();
    }
    String::new()
}

/// Like [`extract_field`], but `None` when the field is absent or blank.
pub fn extract_optional(text: &str, key: &str) -> Option<String> {
    let value = extract_field(text, key);
    if value.is_empty() { None } else { Some(value) }
}
