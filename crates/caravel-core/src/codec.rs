//! Payload codec: bytes to responses, bytes to contact records.

use crate::{BoxResponse, CaravelError, CaravelResult, Contact, HttpResponse};
use bytes::Bytes;
use http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode};
use serde_json::{Map, Value};

/// Field holding the contact identifier in a record payload.
const CONTACT_ID: &str = "contact_id";

/// MIME type used for every payload the proxy produces.
pub const APPLICATION_JSON: &str = "application/json";

/// Wraps `body` as a 200 `application/json` response.
#[must_use]
pub fn json_ok(body: impl Into<Bytes>) -> HttpResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    HttpResponse::new(StatusCode::OK, headers, body)
}

/// Boxed form of [`json_ok`], as returned from cache reads.
#[must_use]
pub fn encode_response(body: impl Into<Bytes>) -> BoxResponse {
    Box::new(json_ok(body))
}

/// Builds a response from what the upstream sent back, unchanged.
#[must_use]
pub fn upstream_response(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> HttpResponse {
    HttpResponse::new(status, headers, body)
}

/// Parses a contact record out of a JSON payload.
///
/// Only a JSON object is a record. Fails on malformed JSON, any other JSON
/// value, a missing or non-string `contact_id`, and an empty identifier.
pub fn decode_record(bytes: &[u8]) -> CaravelResult<Contact> {
    let mut record: Map<String, Value> = serde_json::from_slice(bytes)
        .map_err(|e| CaravelError::decode(format!("invalid contact payload: {}", e)))?;

    match record.remove(CONTACT_ID) {
        Some(Value::String(id)) if id.is_empty() => Err(CaravelError::decode("contact_id must not be empty")),
        Some(Value::String(id)) => Ok(Contact::new(id)),
        Some(other) => Err(CaravelError::decode(format!("contact_id must be a string, found {}", other))),
        None => Err(CaravelError::decode("contact_id is missing")),
    }
}

/// Serializes a contact record to its wire form.
pub fn encode_record(contact: &Contact) -> CaravelResult<Vec<u8>> {
    Ok(serde_json::to_vec(contact)?)
}
