//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound fetch:
//!     → timeouts.rs (one deadline around request + body)
//!     → On failure: error returned to the caller, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: retry policy belongs to the client

pub mod timeouts;
