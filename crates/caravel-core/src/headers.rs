//! Header filtering shared by the inbound and outbound proxy paths.

use http::{HeaderMap, HeaderName};

/// Headers that describe a single connection or message framing and must not
/// be copied from one HTTP exchange to another.
const NON_FORWARDED: [&str; 11] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
    "accept-encoding",
];

/// Returns true if `name` is connection-scoped or framing-related.
#[must_use]
pub fn is_non_forwarded(name: &HeaderName) -> bool {
    NON_FORWARDED.contains(&name.as_str())
}

/// Copies `headers`, dropping connection-scoped and framing headers.
#[must_use]
pub fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_non_forwarded(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
