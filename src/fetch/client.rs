//! Outbound page retrieval.
//!
//! # Responsibilities
//! - Validate the requested target before any network activity
//! - Send a GET with a fixed, browser-like header set
//! - Bound the whole exchange (request + body) by one deadline
//! - Hand back status, headers and raw body untouched

use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use url::Url;

use crate::config::UpstreamConfig;
use crate::fetch::types::{describe_error, FetchFailure, FetchResult, ProxyError, ProxyResult};
use crate::resilience::timeouts::with_deadline;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7";
pub const REFERER: &str = "https://www.google.com/";

/// Headers sent on every outbound fetch.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
    headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
    headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

/// Check that a target is present and is an absolute http(s) URL.
pub fn validate_target(target: Option<&str>) -> ProxyResult<Url> {
    let target = match target {
        Some(t) if !t.is_empty() => t,
        _ => return Err(ProxyError::MissingTarget),
    };

    let url = Url::parse(target).map_err(|e| {
        ProxyError::fetch(FetchFailure::InvalidUrl, format!("invalid URL '{}': {}", target, e))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ProxyError::fetch(
                FetchFailure::InvalidUrl,
                format!("unsupported URL scheme '{}'", other),
            ))
        }
    }

    if url.host_str().is_none() {
        return Err(ProxyError::fetch(
            FetchFailure::InvalidUrl,
            format!("URL '{}' has no host", target),
        ));
    }

    Ok(url)
}

/// Issues outbound fetches. Cheap to clone; the connection pool is shared.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    /// Build a fetcher from upstream settings.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let redirect = if config.follow_redirects {
            Policy::limited(config.max_redirects)
        } else {
            Policy::none()
        };

        let mut builder = reqwest::Client::builder().redirect(redirect);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Deadline applied to each fetch.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate `target` and retrieve it, returning the parsed URL alongside.
    pub async fn fetch(&self, target: Option<&str>) -> ProxyResult<(Url, FetchResult)> {
        let url = validate_target(target)?;
        let result = self.fetch_url(url.clone()).await?;
        Ok((url, result))
    }

    /// Retrieve an already validated URL.
    pub async fn fetch_url(&self, url: Url) -> ProxyResult<FetchResult> {
        with_deadline(self.timeout, self.execute(url)).await
    }

    async fn execute(&self, url: Url) -> ProxyResult<FetchResult> {
        tracing::debug!(url = %url, "Fetching upstream");

        let response = self
            .client
            .get(url)
            .headers(browser_headers())
            .send()
            .await
            .map_err(|e| ProxyError::fetch(classify(&e), describe_error(&e)))?;

        let status = response.status();
        let headers = response.headers().clone();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.bytes().await.map_err(|e| {
            let reason = if e.is_timeout() {
                FetchFailure::Timeout
            } else {
                FetchFailure::Body
            };
            ProxyError::fetch(reason, describe_error(&e))
        })?;

        tracing::debug!(
            status = %status,
            content_type = %content_type,
            bytes = body.len(),
            "Upstream responded"
        );

        Ok(FetchResult {
            status,
            headers,
            body,
            content_type,
        })
    }
}

fn classify(err: &reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        FetchFailure::Timeout
    } else if err.is_builder() {
        FetchFailure::InvalidUrl
    } else {
        FetchFailure::Transport
    }
}
