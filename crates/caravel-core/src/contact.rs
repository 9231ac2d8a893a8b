//! Contact record decoded from upstream payloads.

use serde::Serialize;

/// Minimal view of a contact payload: only its identifier.
///
/// Produced by [`crate::decode_record`]; the identifier is the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    #[serde(rename = "contact_id")]
    pub id: String,
}

impl Contact {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
