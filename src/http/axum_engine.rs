//! Axum engine.
//!
//! Routes `/{rippled_method}` and `/api/{rippled_method}` to the shared
//! handler, with tower-http middleware for request IDs and tracing. The
//! inbound timeout is applied inside the handler so a timed-out request
//! still gets CORS headers and a JSON body.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::PassthroughConfig;
use crate::http::request::{API_PREFIX, HEALTH_PATH};
use crate::passthrough::cors::access_control_request_headers;
use crate::passthrough::{ApiRequest, ApiResponse, Passthrough, PassthroughError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub passthrough: Arc<Passthrough>,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        self.into_http()
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &PassthroughConfig, passthrough: Arc<Passthrough>) -> Router {
    let state = AppState {
        passthrough,
        max_body_bytes: config.server.max_body_bytes,
        request_timeout: Duration::from_secs(config.timeouts.request_secs),
    };

    Router::new()
        .route(HEALTH_PATH, any(health_handler))
        .route("/{rippled_method}", any(passthrough_handler))
        .route(&format!("{}/{{rippled_method}}", API_PREFIX), any(passthrough_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Serve `router` on `listener` until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!(engine = "axum", "Draining connections");
        })
        .await
}

async fn health_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET {
        let requested = access_control_request_headers(&headers);
        return state
            .passthrough
            .reject(
                requested.as_deref(),
                PassthroughError::MethodNotAllowed(method.to_string()),
            )
            .into_response();
    }
    Json(json!({ "status": "ok" })).into_response()
}

async fn not_found_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let requested = access_control_request_headers(&headers);
    state
        .passthrough
        .reject(
            requested.as_deref(),
            PassthroughError::NotFound(uri.path().to_string()),
        )
        .into_response()
}

/// Collects the body, then hands over to the shared handler.
async fn passthrough_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let requested = access_control_request_headers(&headers);
    let rippled_method = match path {
        Ok(Path(rippled_method)) => rippled_method,
        Err(rejection) => {
            return state
                .passthrough
                .reject(
                    requested.as_deref(),
                    PassthroughError::BadPath(rejection.body_text()),
                )
                .into_response();
        }
    };

    let handled = async {
        let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return state
                    .passthrough
                    .reject(requested.as_deref(), PassthroughError::Body(e.to_string()));
            }
        };

        let request = ApiRequest::from_parts(method.as_str(), rippled_method, &uri, &headers, body);
        state.passthrough.handle(request).await
    };

    match tokio::time::timeout(state.request_timeout, handled).await {
        Ok(response) => response.into_response(),
        Err(_) => {
            tracing::warn!(path = %uri.path(), "Request timed out");
            state
                .passthrough
                .reject(
                    requested.as_deref(),
                    PassthroughError::RequestTimeout(state.request_timeout.as_secs()),
                )
                .into_response()
        }
    }
}
