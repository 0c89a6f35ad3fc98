//! Request helpers shared by the engines.
//!
//! # Responsibilities
//! - Pull the `{rippled_method}` path variable out of a raw path
//! - Percent-decode it the same way axum's `Path` extractor does
//! - Make sure every request carries an `X-Request-ID`

use http::header::{HeaderMap, HeaderValue};
use percent_encoding::percent_decode_str;
use uuid::Uuid;

use crate::passthrough::{PassthroughError, X_REQUEST_ID};

/// Optional prefix in front of the method segment.
pub const API_PREFIX: &str = "/api";

/// Liveness check path.
pub const HEALTH_PATH: &str = "/health";

/// The method segment of `/{rippled_method}` or `/api/{rippled_method}`.
///
/// Returns `None` for any other shape, including an empty segment.
pub fn rippled_method_from_path(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(API_PREFIX).filter(|r| r.starts_with('/')).unwrap_or(path);
    let segment = rest.strip_prefix('/')?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    Some(segment)
}

/// Percent-decode a raw path segment.
pub fn decode_path_segment(segment: &str) -> Result<String, PassthroughError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| PassthroughError::BadPath(e.to_string()))
}

/// Return the request's `X-Request-ID`, assigning a UUID v4 if missing.
pub fn ensure_request_id(headers: &mut HeaderMap) -> String {
    if let Some(id) = headers.get(&X_REQUEST_ID).and_then(|v| v.to_str().ok()) {
        return id.to_string();
    }

    let id = Uuid::new_v4().to_string();
    if let Ok(value) = HeaderValue::from_str(&id) {
        headers.insert(&X_REQUEST_ID, value);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_path() {
        assert_eq!(rippled_method_from_path("/ledger"), Some("ledger"));
        assert_eq!(rippled_method_from_path("/api/server_info"), Some("server_info"));
        assert_eq!(rippled_method_from_path("/api"), Some("api"));
        assert_eq!(rippled_method_from_path("/apiary"), Some("apiary"));
        assert_eq!(rippled_method_from_path("/"), None);
        assert_eq!(rippled_method_from_path("/api/"), None);
        assert_eq!(rippled_method_from_path("/a/b"), None);
        assert_eq!(rippled_method_from_path(""), None);
    }

    #[test]
    fn test_decode_path_segment() {
        assert_eq!(decode_path_segment("ledger").unwrap(), "ledger");
        assert_eq!(decode_path_segment("ledger%5Fcurrent").unwrap(), "ledger_current");
        assert_eq!(decode_path_segment("server%20info").unwrap(), "server info");

        let err = decode_path_segment("%FF").unwrap_err();
        assert_eq!(err.kind(), "badPath");
    }

    #[test]
    fn test_request_id_kept_or_assigned() {
        let mut headers = HeaderMap::new();
        headers.insert(&X_REQUEST_ID, HeaderValue::from_static("given"));
        assert_eq!(ensure_request_id(&mut headers), "given");

        let mut headers = HeaderMap::new();
        let id = ensure_request_id(&mut headers);
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(headers[&X_REQUEST_ID], id.as_str());
    }
}
