//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the inbound deadline outlives the outbound one
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    BindAddress(String),

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroUpstreamTimeout,

    #[error("rewrite.proxy_path '{0}' must start with '/' and name a path")]
    ProxyPath(String),

    #[error("timeouts.request_secs ({request}) must exceed upstream.timeout_secs ({upstream})")]
    RequestDeadline { request: u64, upstream: u64 },

    #[error("observability.metrics_address '{0}' is not a valid socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroUpstreamTimeout);
    }

    let proxy_path = &config.rewrite.proxy_path;
    if !proxy_path.starts_with('/') || proxy_path.len() < 2 || proxy_path.contains('?') {
        errors.push(ValidationError::ProxyPath(proxy_path.clone()));
    }

    if config.timeouts.request_secs <= config.upstream.timeout_secs {
        errors.push(ValidationError::RequestDeadline {
            request: config.timeouts.request_secs,
            upstream: config.upstream.timeout_secs,
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
