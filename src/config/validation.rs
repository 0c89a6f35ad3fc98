//! Configuration validation.
//!
//! Serde handles syntax; this checks values: addresses parse, timeouts are
//! positive and ordered, the fallback upstream is an http(s) URL. All
//! problems are reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::PassthroughConfig;
use crate::upstream::parse_endpoint;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &PassthroughConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.server.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address: {}", config.server.bind_address, e),
        ));
    }

    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::new("server.max_body_bytes", "must be greater than 0"));
    }

    if let Err(e) = parse_endpoint(&config.upstream.default_url()) {
        errors.push(ValidationError::new("upstream.url", e.to_string()));
    }

    if config.upstream.env_var.trim().is_empty() {
        errors.push(ValidationError::new("upstream.env_var", "must not be empty"));
    }

    for (field, secs) in [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::new(field, "must be greater than 0"));
        }
    }

    // The upstream deadline has to fire first, or clients see 408 instead of 504.
    let timeouts = &config.timeouts;
    if timeouts.upstream_secs > 0 && timeouts.request_secs <= timeouts.upstream_secs {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!(
                "must be greater than timeouts.upstream_secs ({})",
                timeouts.upstream_secs
            ),
        ));
    }

    if config.observability.metrics_enabled {
        if let Err(e) = config.observability.metrics_address.parse::<SocketAddr>() {
            errors.push(ValidationError::new(
                "observability.metrics_address",
                format!("'{}' is not a socket address: {}", config.observability.metrics_address, e),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
