//! Response header filtering.
//!
//! # Responsibilities
//! - Strip hop-by-hop and framing headers recomputed by our transport
//! - Strip headers that would misrepresent or lock down the proxied page
//!
//! # Design Decisions
//! - Denylist, not allowlist: unknown upstream headers pass through
//! - Matching is case-insensitive; duplicate values are preserved

use axum::http::HeaderMap;

/// Upstream response headers never copied to the client.
pub const HEADER_FILTER_SET: &[&str] = &[
    "content-encoding",
    "content-length",
    "transfer-encoding",
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "set-cookie",
    "www-authenticate",
    "x-frame-options",
    "content-security-policy",
];

/// Whether a header name is in the filter set.
pub fn is_filtered(name: &str) -> bool {
    HEADER_FILTER_SET
        .iter()
        .any(|h| name.eq_ignore_ascii_case(h))
}

/// Copy every header not in the filter set, keeping order and duplicates.
pub fn filter_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if !is_filtered(name.as_str()) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}
