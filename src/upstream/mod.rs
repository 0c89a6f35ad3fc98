//! Upstream rippled integration subsystem.
//!
//! # Data Flow
//! ```text
//! jrpcURL query / JSON_RPC_URL env / configured network
//!     → endpoint.rs (pick first non-empty, parse URL)
//!     → client.rs (wrap params, POST, unwrap "result")
//! ```
//!
//! # Constraints
//! - The environment is read per request, never cached
//! - Params and result are relayed byte-for-byte
//! - No retries: one POST per inbound request

pub mod client;
pub mod endpoint;
pub mod network;
pub mod types;

pub use client::{build_request_body, extract_result, RippledClient};
pub use endpoint::{
    first_non_empty, parse_endpoint, resolve_endpoint, EndpointResolver, JRPC_URL_QUERY_PARAM,
    JSON_RPC_URL_ENV,
};
pub use network::Network;
pub use types::{UpstreamError, UpstreamResult};
