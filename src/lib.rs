//! HTTP to rippled JSON-RPC passthrough library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod passthrough;
pub mod upstream;

pub use config::schema::PassthroughConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use passthrough::Passthrough;
