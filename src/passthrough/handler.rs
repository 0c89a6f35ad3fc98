//! The request handler shared by both engines.

use std::time::Instant;

use bytes::Bytes;
use http::header::HeaderValue;
use http::StatusCode;

use crate::config::{Engine, PassthroughConfig};
use crate::observability::metrics;
use crate::passthrough::cors::cors_headers;
use crate::passthrough::error::PassthroughError;
use crate::passthrough::types::{ApiRequest, ApiResponse, X_REQUEST_ID};
use crate::upstream::{
    EndpointResolver, RippledClient, UpstreamResult, JRPC_URL_QUERY_PARAM,
};

/// Relays rippled JSON-RPC calls; holds no per-request state.
#[derive(Debug, Clone)]
pub struct Passthrough {
    engine: Engine,
    client: RippledClient,
    resolver: EndpointResolver,
}

/// Trimmed, lower-cased rippled method.
pub fn normalize_method(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl Passthrough {
    pub fn new(config: &PassthroughConfig) -> UpstreamResult<Self> {
        let client = RippledClient::new(&config.upstream, &config.timeouts)?;
        let resolver =
            EndpointResolver::new(config.upstream.env_var.clone(), config.upstream.default_url());
        Ok(Self {
            engine: config.server.engine,
            client,
            resolver,
        })
    }

    /// Engine this handler is serving under, used as a metrics label.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Handle one inbound request.
    ///
    /// OPTIONS is answered locally. Everything else is forwarded, and the
    /// upstream `result` member becomes the response body unchanged.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let start_time = Instant::now();
        let http_method = request.http_method.trim().to_uppercase();
        let mut headers = cors_headers(request.access_control_request_headers.as_deref());
        if let Some(id) = request
            .request_id
            .as_deref()
            .and_then(|id| id.parse::<HeaderValue>().ok())
        {
            headers.insert(&X_REQUEST_ID, id);
        }

        if http_method == "OPTIONS" {
            return ApiResponse::empty(StatusCode::OK, headers);
        }

        let rippled_method = normalize_method(&request.rippled_method);
        let request_id = request.request_id.as_deref().unwrap_or("unknown");

        tracing::info!(
            request_id = %request_id,
            http_method = %http_method,
            rippled_method = %rippled_method,
            "Relaying request"
        );
        tracing::debug!(
            request_id = %request_id,
            body = %String::from_utf8_lossy(&request.body),
            "Request body"
        );

        let response = match self.forward(&http_method, &rippled_method, &request).await {
            Ok(result) => ApiResponse::json(StatusCode::OK, headers, result),
            Err(e) => {
                log_failure(request_id, &rippled_method, &e);
                ApiResponse::json(e.status(), headers, e.to_body())
            }
        };

        metrics::record_request(
            self.engine.as_str(),
            &rippled_method,
            response.status.as_u16(),
            start_time,
        );
        response
    }

    /// Error response for a request that failed before it could be handled:
    /// unknown path, undecodable path, unreadable body or inbound timeout.
    pub fn reject(&self, requested_headers: Option<&str>, error: PassthroughError) -> ApiResponse {
        log_failure("unknown", "", &error);
        let status = error.status();
        metrics::record_request(self.engine.as_str(), "", status.as_u16(), Instant::now());
        ApiResponse::json(status, cors_headers(requested_headers), error.to_body())
    }

    async fn forward(
        &self,
        http_method: &str,
        rippled_method: &str,
        request: &ApiRequest,
    ) -> Result<Bytes, PassthroughError> {
        if !matches!(http_method, "GET" | "POST") {
            return Err(PassthroughError::MethodNotAllowed(http_method.to_string()));
        }
        if rippled_method.is_empty() {
            return Err(PassthroughError::MissingMethod);
        }

        let url = self
            .resolver
            .resolve(request.query_value(JRPC_URL_QUERY_PARAM))?;
        tracing::debug!(json_rpc_remote_url = %url, "Resolved upstream");

        Ok(self.client.call(&url, rippled_method, &request.body).await?)
    }
}

fn log_failure(request_id: &str, rippled_method: &str, error: &PassthroughError) {
    if error.is_client_error() {
        tracing::warn!(
            request_id = %request_id,
            rippled_method = %rippled_method,
            error = %error,
            "Rejected request"
        );
    } else {
        tracing::error!(
            request_id = %request_id,
            rippled_method = %rippled_method,
            error = %error,
            "Upstream call failed"
        );
    }
}
