//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! GET /proxy?url=...
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (fetch, rewrite when HTML)
//!     → response.rs (filter headers, keep status)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{assign_request_id, X_REQUEST_ID};
pub use response::assemble;
pub use server::{AppState, HttpServer};
