//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (pick engine)
//!     → axum_engine.rs | hyper_engine.rs (routing, request ID, body limit, timeout)
//!     → request.rs helpers (path variable, request ID)
//!     → passthrough handler
//!     → engine writes ApiResponse back
//! ```

pub mod axum_engine;
pub mod hyper_engine;
pub mod request;
pub mod server;

pub use request::{ensure_request_id, rippled_method_from_path};
pub use server::HttpServer;
