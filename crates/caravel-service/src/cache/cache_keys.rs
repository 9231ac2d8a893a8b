//! Cache key generation.

/// Builds the Redis key for a contact id.
///
/// With an empty prefix the key is the id itself.
#[must_use]
pub fn contact_key(prefix: &str, id: &str) -> String {
    if prefix.is_empty() {
        id.to_string()
    } else {
        format!("{}:{}", prefix, id)
    }
}
