//! Internet 3.0 rewriting forward proxy.
//!
//! Fetches a page on behalf of a client, routes its links back through
//! `/proxy?url=...`, and adds a status banner to HTML documents.

// Core subsystems
pub mod config;
pub mod fetch;
pub mod http;
pub mod rewrite;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use rewrite::{RewriteContext, RewritePipeline};
