//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream response headers
//!     → headers.rs (drop denylisted names)
//!     → Response assembly
//! ```

pub mod headers;

pub use headers::{filter_headers, is_filtered, HEADER_FILTER_SET};
