//! Outbound fetch subsystem.
//!
//! # Data Flow
//! ```text
//! ProxyRequest (?url=)
//!     → client.rs (validate target, browser headers, deadline)
//!     → FetchResult { status, headers, body, content_type }
//!     → or ProxyError { MissingTarget | Fetch }
//! ```
//!
//! # Design Decisions
//! - No fetch is attempted without a valid absolute target
//! - No caching, no retries, no cookie forwarding
//! - Non-2xx upstream statuses are results, not errors

pub mod client;
pub mod types;

pub use client::{browser_headers, validate_target, Fetcher};
pub use types::{FetchFailure, FetchResult, ProxyError, ProxyRequest, ProxyResult};
