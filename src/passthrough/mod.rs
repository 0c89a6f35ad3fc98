//! HTTP to rippled JSON-RPC passthrough.
//!
//! # Data Flow
//! ```text
//! engine adapter (axum / hyper)
//!     → ApiRequest (method, path variable, query, CORS header, body)
//!     → handler.rs (CORS, OPTIONS short-circuit, resolve, forward)
//!     → ApiResponse (status, headers, raw "result" JSON)
//!     → engine adapter writes it back
//! ```

pub mod cors;
pub mod error;
pub mod handler;
pub mod types;

pub use error::PassthroughError;
pub use handler::{normalize_method, Passthrough};
pub use types::{ApiRequest, ApiResponse, CONTENT_TYPE_JSON_UTF8, X_REQUEST_ID};
