//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Root configuration for the rewriting proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Outbound fetch settings.
    pub upstream: UpstreamConfig,

    /// Content rewriting settings.
    pub rewrite: RewriteConfig,

    /// Inbound request timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl ListenerConfig {
    /// Replace the port of the bind address, keeping the host part.
    pub fn set_port(&mut self, port: u16) -> Result<(), std::net::AddrParseError> {
        let mut addr: SocketAddr = self.bind_address.parse()?;
        addr.set_port(port);
        self.bind_address = addr.to_string();
        Ok(())
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Outbound fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Deadline for the whole fetch (connect, headers and body) in seconds.
    pub timeout_secs: u64,

    /// Follow upstream redirects.
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow.
    pub max_redirects: usize,

    /// Honor HTTP_PROXY / HTTPS_PROXY from the environment.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            follow_redirects: true,
            max_redirects: 10,
            use_system_proxy: true,
        }
    }
}

/// Content rewriting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Path of the proxy endpoint; rewritten links point here.
    pub proxy_path: String,

    /// Inject the status banner into HTML pages.
    pub banner_enabled: bool,

    /// HTML-escape the target URL shown in the banner.
    /// Off by default so the banner matches the historical output byte for byte.
    pub escape_banner_url: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            proxy_path: "/proxy".to_string(),
            banner_enabled: true,
            escape_banner_url: false,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Must exceed `upstream.timeout_secs` so fetch errors surface as 500s.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address of the Prometheus scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
