//! Fetch results and proxy error definitions.

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use thiserror::Error;

use crate::rewrite::is_html;

/// Inbound proxy request, taken from the query string.
#[derive(Debug, Clone, Default)]
pub struct ProxyRequest {
    /// Target page (`?url=`).
    pub target_url: Option<String>,
}

impl ProxyRequest {
    /// Read the target from a raw query string.
    ///
    /// A repeated `url` key keeps its first value. Parsing never fails.
    pub fn from_query(query: Option<&str>) -> Self {
        let target_url = query.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "url")
                .map(|(_, value)| value.into_owned())
        });
        Self { target_url }
    }

    /// The target, if present and non-empty.
    pub fn target(&self) -> Option<&str> {
        self.target_url.as_deref().filter(|t| !t.is_empty())
    }
}

/// What the upstream returned.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Upstream status code, passed through unchanged.
    pub status: StatusCode,
    /// Upstream headers, in order, duplicates kept.
    pub headers: HeaderMap,
    /// Raw body bytes.
    pub body: Bytes,
    /// Declared `Content-Type`, or empty.
    pub content_type: String,
}

impl FetchResult {
    /// Whether the body goes through the rewriting pipeline.
    pub fn is_html(&self) -> bool {
        is_html(&self.content_type)
    }
}

/// Why an outbound fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// Target is not an absolute http(s) URL.
    InvalidUrl,
    /// Deadline elapsed.
    Timeout,
    /// Connect, DNS, TLS or protocol failure.
    Transport,
    /// Reading the body failed.
    Body,
}

impl FetchFailure {
    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchFailure::InvalidUrl => "invalid_url",
            FetchFailure::Timeout => "timeout",
            FetchFailure::Transport => "transport",
            FetchFailure::Body => "body",
        }
    }
}

/// Errors surfaced by the proxy endpoint.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Client omitted the `url` parameter or left it empty.
    #[error("URL não fornecida")]
    MissingTarget,

    /// The outbound retrieval failed.
    #[error("Erro ao acessar a URL: {cause}")]
    Fetch { reason: FetchFailure, cause: String },
}

impl ProxyError {
    /// Build a fetch error from a reason and a cause description.
    pub fn fetch(reason: FetchFailure, cause: impl Into<String>) -> Self {
        ProxyError::Fetch {
            reason,
            cause: cause.into(),
        }
    }

    /// Status code the error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingTarget => StatusCode::BAD_REQUEST,
            ProxyError::Fetch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Describe an error with its whole source chain.
pub fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = inner.source();
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ProxyError::MissingTarget.to_string(), "URL não fornecida");

        let err = ProxyError::fetch(FetchFailure::Timeout, "request timed out after 10s");
        assert_eq!(
            err.to_string(),
            "Erro ao acessar a URL: request timed out after 10s"
        );
    }

    #[test]
    fn test_error_status() {
        assert_eq!(ProxyError::MissingTarget.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ProxyError::fetch(FetchFailure::Transport, "refused").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_request_target() {
        let empty = ProxyRequest {
            target_url: Some(String::new()),
        };
        assert_eq!(empty.target(), None);
        assert_eq!(ProxyRequest::default().target(), None);

        let set = ProxyRequest {
            target_url: Some("https://example.com".into()),
        };
        assert_eq!(set.target(), Some("https://example.com"));
    }

    #[test]
    fn test_request_from_query() {
        assert_eq!(ProxyRequest::from_query(None).target(), None);
        assert_eq!(ProxyRequest::from_query(Some("other=1")).target(), None);
        assert_eq!(ProxyRequest::from_query(Some("url=")).target(), None);

        let encoded = ProxyRequest::from_query(Some("url=https%3A%2F%2Fexample.com%2Fa%3Fb%3D1"));
        assert_eq!(encoded.target(), Some("https://example.com/a?b=1"));

        let repeated = ProxyRequest::from_query(Some("url=https://first.test/&url=https://second.test/"));
        assert_eq!(repeated.target(), Some("https://first.test/"));

        let malformed = ProxyRequest::from_query(Some("url=%zz&&=x"));
        assert_eq!(malformed.target(), Some("%zz"));
    }

    #[test]
    fn test_describe_error_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let outer = ConfigLike(inner);
        assert_eq!(describe_error(&outer), "connect failed: connection refused");
    }

    #[derive(Debug, Error)]
    #[error("connect failed")]
    struct ConfigLike(#[source] std::io::Error);
}
