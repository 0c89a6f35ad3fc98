//! Permissive CORS headers.
//!
//! Every response allows any origin. Requested headers are echoed back so
//! browser preflights succeed whatever the client sends.

use http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS,
};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Trimmed `Access-Control-Request-Headers` value, if present and non-empty.
pub fn access_control_request_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ACCESS_CONTROL_REQUEST_HEADERS)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Set the CORS response headers.
pub fn apply_cors(headers: &mut HeaderMap, requested_headers: Option<&str>) {
    if let Some(requested) = requested_headers.map(str::trim).filter(|v| !v.is_empty()) {
        match HeaderValue::from_str(requested) {
            Ok(value) => {
                headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, value);
            }
            Err(_) => tracing::debug!(requested = %requested, "Not echoing unrepresentable header list"),
        }
    }
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
}

/// Fresh header map carrying only the CORS headers.
pub fn cors_headers(requested_headers: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    apply_cors(&mut headers, requested_headers);
    headers
}
