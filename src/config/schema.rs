//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the passthrough.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::upstream::Network;

/// Root configuration for the passthrough.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PassthroughConfig {
    /// Inbound server settings (bind address, engine, body limit).
    pub server: ServerConfig,

    /// Upstream rippled endpoint resolution.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP engine serving inbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Axum router with tower-http middleware.
    #[default]
    Axum,
    /// Bare hyper connection loop.
    Hyper,
}

impl Engine {
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Axum => "axum",
            Engine::Hyper => "hyper",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "axum" => Ok(Engine::Axum),
            "hyper" => Ok(Engine::Hyper),
            other => Err(format!("unknown engine '{}', expected 'axum' or 'hyper'", other)),
        }
    }
}

/// Inbound server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Which HTTP engine accepts connections.
    pub engine: Engine,

    /// Maximum inbound request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            engine: Engine::Axum,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Upstream endpoint configuration.
///
/// Per request, the endpoint is the first non-empty of: the `jrpcURL` query
/// parameter, the environment variable named by `env_var`, then `url` or the
/// public URL of `network`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Network whose public JSON-RPC URL is the fallback endpoint.
    pub network: Network,

    /// Explicit fallback endpoint, overrides `network`.
    pub url: Option<String>,

    /// Environment variable consulted on every request.
    pub env_var: String,

    /// Honour HTTP(S)_PROXY settings for upstream calls.
    pub use_system_proxy: bool,
}

impl UpstreamConfig {
    /// The endpoint used when neither the query nor the environment name one.
    pub fn default_url(&self) -> String {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => self.network.public_json_rpc_url().to_string(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            url: None,
            env_var: crate::upstream::JSON_RPC_URL_ENV.to_string(),
            use_system_proxy: true,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Upstream JSON-RPC call timeout in seconds.
    pub upstream_secs: u64,

    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 20,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
