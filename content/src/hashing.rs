//! Content hashing utilities for change detection and indexing

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Normalized keys describing where content lives rather than what it says
const DIMENSION_FIELDS: &[&str] = &[
    "id",
    "resourceKey",
    "locale",
    "stage",
    "ghostLocale",
    "availableLocales",
    "workflowPlace",
    "published",
];

/// Generate a SHA256 content hash from normalized content
///
/// Dimension bookkeeping keys are excluded, so a draft and its live copy hash
/// equally as long as their content matches. Keys are hashed in sorted order.
///
/// # Example
///
/// ```rust
/// use serde_json::{json, Map};
/// use content::generate_content_hash;
///
/// let mut data = Map::new();
/// data.insert("title".to_string(), json!("My Article"));
/// data.insert("stage".to_string(), json!("draft")); // Will be excluded
///
/// let hash = generate_content_hash(&data);
/// assert_eq!(hash.len(), 64); // SHA256 produces 64 hex characters
/// ```
pub fn generate_content_hash(data: &Map<String, Value>) -> String {
    let mut hasher = Sha256::new();
    let mut sorted_data: Vec<_> = data.iter().collect();
    sorted_data.sort_by_key(|&(k, _)| k);

    for (key, value) in sorted_data {
        if DIMENSION_FIELDS.contains(&key.as_str()) {
            continue;
        }
        hasher.update(key.as_bytes());
        hasher.update(value.to_string().as_bytes());
    }

    format!("{:x}", hasher.finalize())
}

/// Verify if content has changed by comparing hashes
pub fn has_content_changed(old_data: &Map<String, Value>, new_data: &Map<String, Value>) -> bool {
    generate_content_hash(old_data) != generate_content_hash(new_data)
}
