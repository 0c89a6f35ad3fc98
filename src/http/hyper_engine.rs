//! Bare hyper engine.
//!
//! Accept loop over hyper-util's auto (HTTP/1.1 + HTTP/2) connection builder.
//! Does its own path matching and decoding, request IDs and timeout, then
//! calls the same handler as the axum engine.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::PassthroughConfig;
use crate::http::request::{
    decode_path_segment, ensure_request_id, rippled_method_from_path, HEALTH_PATH,
};
use crate::passthrough::cors::access_control_request_headers;
use crate::passthrough::{ApiRequest, Passthrough, PassthroughError, CONTENT_TYPE_JSON_UTF8};

/// How long open connections get to finish after shutdown starts.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-connection settings.
#[derive(Clone)]
struct EngineState {
    passthrough: Arc<Passthrough>,
    max_body_bytes: usize,
    request_timeout: Duration,
}

/// Serve on `listener` until `shutdown` fires, then drain open connections.
pub async fn serve(
    listener: TcpListener,
    config: &PassthroughConfig,
    passthrough: Arc<Passthrough>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let state = EngineState {
        passthrough,
        max_body_bytes: config.server.max_body_bytes,
        request_timeout: Duration::from_secs(config.timeouts.request_secs),
    };
    let builder = Builder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };

                let state = state.clone();
                let service = service_fn(move |request: Request<Incoming>| {
                    let state = state.clone();
                    async move { Ok::<_, Infallible>(dispatch(&state, request).await) }
                });

                let connection = builder.serve_connection(TokioIo::new(stream), service);
                let connection = graceful.watch(connection.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::debug!(peer = %peer, error = %e, "Connection closed with error");
                    }
                });
            }
            _ = shutdown.recv() => {
                tracing::info!(engine = "hyper", "Draining connections");
                break;
            }
        }
    }

    drop(listener);
    tokio::select! {
        _ = graceful.shutdown() => tracing::debug!("All connections drained"),
        _ = tokio::time::sleep(DRAIN_TIMEOUT) => {
            tracing::warn!(timeout_secs = DRAIN_TIMEOUT.as_secs(), "Timed out draining connections");
        }
    }

    Ok(())
}

async fn dispatch(state: &EngineState, request: Request<Incoming>) -> Response<Full<Bytes>> {
    let (mut parts, body) = request.into_parts();
    let request_id = ensure_request_id(&mut parts.headers);
    let path = parts.uri.path().to_string();
    let requested = access_control_request_headers(&parts.headers);

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %path,
        "Incoming request"
    );

    if path == HEALTH_PATH {
        return if parts.method == Method::GET {
            health_response()
        } else {
            state
                .passthrough
                .reject(
                    requested.as_deref(),
                    PassthroughError::MethodNotAllowed(parts.method.to_string()),
                )
                .into_http()
        };
    }

    let rippled_method = match rippled_method_from_path(&path)
        .ok_or_else(|| PassthroughError::NotFound(path.clone()))
        .and_then(decode_path_segment)
    {
        Ok(rippled_method) => rippled_method,
        Err(e) => return state.passthrough.reject(requested.as_deref(), e).into_http(),
    };

    let handled = async {
        let body = match Limited::new(body, state.max_body_bytes).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                return state
                    .passthrough
                    .reject(requested.as_deref(), PassthroughError::Body(e.to_string()));
            }
        };

        let request = ApiRequest::from_parts(
            parts.method.as_str(),
            rippled_method,
            &parts.uri,
            &parts.headers,
            body,
        );
        state.passthrough.handle(request).await
    };

    match tokio::time::timeout(state.request_timeout, handled).await {
        Ok(response) => response.into_http(),
        Err(_) => {
            tracing::warn!(request_id = %request_id, path = %path, "Request timed out");
            state
                .passthrough
                .reject(
                    requested.as_deref(),
                    PassthroughError::RequestTimeout(state.request_timeout.as_secs()),
                )
                .into_http()
        }
    }
}

fn health_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(br#"{"status":"ok"}"#)));
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static(CONTENT_TYPE_JSON_UTF8),
    );
    response
}
