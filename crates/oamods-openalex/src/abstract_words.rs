//! Flatten an OpenAlex abstract inverted index into classifier input
//!
//! OpenAlex stores abstracts as inverted indexes for legal reasons:
//! ```json
//! {"Despite": [0], "growing": [1], "interest": [2, 50], ...}
//! ```
//!
//! The classifier only needs the vocabulary, so each distinct word is
//! emitted once, in the order the keys appear in the JSON object. Positions
//! are ignored.

use serde_json::{Map, Value};

/// Join the index keys with single spaces, in object order.
///
/// # Example
/// ```
/// use serde_json::json;
/// use oamods_openalex::abstract_words::join_index_keys;
///
/// let index = json!({"the": [0, 2], "cat": [1], "sat": [3]});
/// assert_eq!(join_index_keys(index.as_object().unwrap()), "the cat sat");
/// ```
pub fn join_index_keys(index: &Map<String, Value>) -> String {
    index.keys().map(String::as_str).collect::<Vec<_>>().join(" ")
}
