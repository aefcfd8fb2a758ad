//! Response assembly.
//!
//! # Responsibilities
//! - Build the client response from the fetch result and final body
//! - Drop denylisted upstream headers
//! - Map proxy errors to status codes and plain-text bodies
//!
//! # Design Decisions
//! - The upstream status is passed through unchanged
//! - Content-Length is never copied; the transport recomputes it
//! - No partial bodies: the body is complete before the response is built

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::fetch::{FetchResult, ProxyError};
use crate::security::filter_headers;

/// Build the outbound response for a fetch and its final body.
pub fn assemble(fetch: FetchResult, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = fetch.status;
    *response.headers_mut() = filter_headers(&fetch.headers);
    response
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, self.to_string()).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}
