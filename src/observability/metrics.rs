//! Metrics collection and exposition.
//!
//! # Metrics
//! - `passthrough_requests_total` (counter): requests by engine, rippled method, status
//! - `passthrough_request_duration_seconds` (histogram): handler latency by engine, rippled method
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Longest method name used verbatim as a label value.
const MAX_METHOD_LABEL_LEN: usize = 40;

/// Label value for a rippled method.
///
/// The method comes from the client's path, so anything that does not look
/// like a rippled method name collapses to `other`.
pub fn method_label(rippled_method: &str) -> &str {
    if rippled_method.is_empty() {
        "none"
    } else if rippled_method.len() <= MAX_METHOD_LABEL_LEN
        && rippled_method.bytes().all(|b| b.is_ascii_lowercase() || b == b'_')
    {
        rippled_method
    } else {
        "other"
    }
}

/// Record one handled request.
pub fn record_request(engine: &'static str, rippled_method: &str, status: u16, start_time: Instant) {
    let method = method_label(rippled_method).to_string();

    metrics::counter!(
        "passthrough_requests_total",
        "engine" => engine,
        "method" => method.clone(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "passthrough_request_duration_seconds",
        "engine" => engine,
        "method" => method
    )
    .record(start_time.elapsed().as_secs_f64());
}
