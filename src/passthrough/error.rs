//! Passthrough failures and their HTTP mapping.

use bytes::Bytes;
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Any reason a request could not be relayed.
#[derive(Debug, Error)]
pub enum PassthroughError {
    /// HTTP method other than GET, POST or OPTIONS.
    #[error("HTTP method {0} is not supported")]
    MethodNotAllowed(String),

    /// Path variable was empty after trimming.
    #[error("Missing rippled method in request path")]
    MissingMethod,

    /// Path is not `/{rippled_method}` or `/api/{rippled_method}`.
    #[error("No route for path {0}")]
    NotFound(String),

    /// Path variable is not valid percent-encoded UTF-8.
    #[error("Invalid rippled method in request path: {0}")]
    BadPath(String),

    /// Whole request exceeded the inbound timeout.
    #[error("Request timed out after {0} seconds")]
    RequestTimeout(u64),

    /// Inbound body could not be read (too large, connection dropped).
    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    error_message: String,
}

impl PassthroughError {
    /// Status code the client receives.
    pub fn status(&self) -> StatusCode {
        match self {
            PassthroughError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            PassthroughError::MissingMethod
            | PassthroughError::BadPath(_)
            | PassthroughError::Body(_) => StatusCode::BAD_REQUEST,
            PassthroughError::NotFound(_) => StatusCode::NOT_FOUND,
            PassthroughError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            PassthroughError::Upstream(e) => match e {
                UpstreamError::InvalidUrl { .. } | UpstreamError::InvalidParams(_) => {
                    StatusCode::BAD_REQUEST
                }
                UpstreamError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                UpstreamError::Transport(_)
                | UpstreamError::InvalidResponse(_)
                | UpstreamError::MissingResult => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Short machine-readable kind, in rippled's camelCase style.
    pub fn kind(&self) -> &'static str {
        match self {
            PassthroughError::MethodNotAllowed(_) => "methodNotAllowed",
            PassthroughError::MissingMethod => "missingMethod",
            PassthroughError::NotFound(_) => "notFound",
            PassthroughError::BadPath(_) => "badPath",
            PassthroughError::RequestTimeout(_) => "requestTimeout",
            PassthroughError::Body(_) => "badRequestBody",
            PassthroughError::Upstream(e) => match e {
                UpstreamError::InvalidUrl { .. } => "invalidUpstreamUrl",
                UpstreamError::InvalidParams(_) => "invalidParams",
                UpstreamError::Timeout(_) => "upstreamTimeout",
                UpstreamError::Transport(_) => "upstreamUnavailable",
                UpstreamError::InvalidResponse(_) | UpstreamError::MissingResult => {
                    "badUpstreamResponse"
                }
            },
        }
    }

    /// Whether the client, not the upstream, is at fault.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// JSON body `{"error": kind, "error_message": text}`.
    pub fn to_body(&self) -> Bytes {
        let body = ErrorBody {
            error: self.kind(),
            error_message: self.to_string(),
        };
        // Serializing a struct of two strings cannot fail.
        serde_json::to_vec(&body).map(Bytes::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(PassthroughError::MissingMethod.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            PassthroughError::MethodNotAllowed("PUT".into()).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            PassthroughError::from(UpstreamError::Timeout(5)).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            PassthroughError::from(UpstreamError::MissingResult).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            PassthroughError::from(UpstreamError::InvalidUrl {
                url: "x".into(),
                reason: "y".into()
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_routing_and_timeout_errors() {
        let err = PassthroughError::NotFound("/a/b".into());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), "notFound");

        let err = PassthroughError::BadPath("invalid utf-8 sequence".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "badPath");

        let err = PassthroughError::RequestTimeout(30);
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(err.to_string(), "Request timed out after 30 seconds");
    }

    #[test]
    fn test_error_body() {
        let err = PassthroughError::from(UpstreamError::MissingResult);
        let body: serde_json::Value = serde_json::from_slice(&err.to_body()).unwrap();
        assert_eq!(body["error"], "badUpstreamResponse");
        assert_eq!(
            body["error_message"],
            "Upstream response has no \"result\" member"
        );
        assert!(!err.is_client_error());
    }
}
