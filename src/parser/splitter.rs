//! Recover individual JSON objects from a concatenated evaluator log.
//!
//! Evaluator logs are not JSON Lines: they are pretty-printed JSON objects
//! concatenated with blank-line separators. The boundary between two
//! top-level objects is a closing brace at the start of a line, blank
//! line(s), then an opening brace. Nested closing braces are always
//! followed by a comma or another closing brace, never a fresh top-level
//! key, so this boundary never occurs inside an object. That invariant
//! holds for the known log generator but is an assumption, not a contract.

use crate::utils::config::RECORD_EXCERPT_CHARS;
use log::warn;
use serde_json::Value;

/// Split a multi-object pretty-printed log into individual JSON strings
///
/// **Public** - first stage of every parse
///
/// # Arguments
/// * `content` - Full text content of the log file
///
/// # Returns
/// One string per top-level object, in file order. Empty or
/// whitespace-only content yields an empty vector. This stage never
/// fails; decode failures are handled one layer up.
pub fn split_json_objects(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    // Fragments between boundaries. Each boundary consumes the closing
    // brace of the previous object and the opening brace of the next, so
    // both are re-attached below.
    let mut fragments: Vec<&str> = Vec::new();
    let bytes = trimmed.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\n' && bytes.get(i + 1) == Some(&b'}') {
            // Candidate boundary: `\n}` then whitespace containing at
            // least one more newline, then `{`.
            let mut j = i + 2;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            let gap_has_newline = bytes[i + 2..j].contains(&b'\n');
            if gap_has_newline && bytes.get(j) == Some(&b'{') {
                fragments.push(&trimmed[start..i]);
                start = j + 1;
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }

    if fragments.is_empty() {
        // Single object - return as-is
        return vec![trimmed.to_string()];
    }

    fragments.push(&trimmed[start..]);

    // Reconstruct: every fragment except the first lost its opening brace,
    // every fragment except the last lost its closing brace.
    let last = fragments.len() - 1;
    fragments
        .iter()
        .enumerate()
        .map(|(idx, fragment)| {
            let mut obj = String::with_capacity(fragment.len() + 4);
            if idx > 0 {
                obj.push_str("{\n");
            }
            obj.push_str(fragment);
            if idx < last {
                obj.push_str("\n}");
            }
            obj
        })
        .collect()
}

/// Decode every candidate object string as a generic JSON value
///
/// **Public** - produces the record sequence consumed by the correlators
///
/// Decoding is independent per record: a malformed record is skipped with
/// a diagnostic and never invalidates the rest of the file.
pub fn decode_records(content: &str) -> Vec<Value> {
    let candidates = split_json_objects(content);
    let mut records = Vec::with_capacity(candidates.len());

    for candidate in &candidates {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => records.push(value),
            Err(e) => {
                let excerpt: String = candidate.chars().take(RECORD_EXCERPT_CHARS).collect();
                warn!("Failed to parse evaluator log object ({}): {}...", e, excerpt);
            }
        }
    }

    records
}
