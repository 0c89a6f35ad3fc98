//! Upstream error definitions.

use thiserror::Error;

/// Errors that can occur while calling the upstream rippled server.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Endpoint is not an absolute http(s) URL.
    #[error("Invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Request body could not be used as JSON-RPC params.
    #[error("Request params are not valid JSON: {0}")]
    InvalidParams(#[source] serde_json::Error),

    /// Upstream did not answer in time.
    #[error("Upstream request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection or protocol failure talking to upstream.
    #[error("Upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Upstream answered with something that is not JSON.
    #[error("Upstream response is not valid JSON: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    /// Upstream answered with JSON lacking a `result` member.
    #[error("Upstream response has no \"result\" member")]
    MissingResult,
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UpstreamError::Timeout(20);
        assert_eq!(err.to_string(), "Upstream request timed out after 20 seconds");

        let err = UpstreamError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("'nope'"));
    }
}
