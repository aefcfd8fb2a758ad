//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the fetcher produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID is attached to every proxy log event
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
