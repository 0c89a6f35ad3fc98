//! rippled JSON-RPC client.
//!
//! # Responsibilities
//! - Wrap a request body as the params of a rippled JSON-RPC call
//! - POST it to the resolved endpoint with timeouts
//! - Pull the raw `result` member out of the response
//!
//! rippled expects `{"method": "...", "params": [ { ... } ]}`. The params
//! object is passed through untouched, and so is the result.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::upstream::types::{UpstreamError, UpstreamResult};

const EMPTY_PARAMS: &str = "{}";

#[derive(Serialize)]
#[serde(untagged)]
enum Params<'a> {
    /// Body already is a params array.
    Array(&'a RawValue),
    /// Body is the single params object.
    Single([&'a RawValue; 1]),
}

#[derive(Serialize)]
struct RpcCall<'a> {
    method: &'a str,
    params: Params<'a>,
}

#[derive(Deserialize)]
struct RpcEnvelope<'a> {
    #[serde(borrow, default)]
    result: Option<&'a RawValue>,
}

/// Build the JSON-RPC request body for `method` with `params` as given by the caller.
///
/// An empty (or whitespace-only) body means no params and becomes `[{}]`.
pub fn build_request_body(method: &str, params: &[u8]) -> UpstreamResult<Vec<u8>> {
    let trimmed = params.trim_ascii();
    let raw: &RawValue = if trimmed.is_empty() {
        serde_json::from_str(EMPTY_PARAMS).map_err(UpstreamError::InvalidParams)?
    } else {
        serde_json::from_slice(trimmed).map_err(UpstreamError::InvalidParams)?
    };

    let params = if raw.get().starts_with('[') {
        Params::Array(raw)
    } else {
        Params::Single([raw])
    };

    serde_json::to_vec(&RpcCall { method, params }).map_err(UpstreamError::InvalidParams)
}

/// Return the raw JSON text of the top-level `result` member.
///
/// A `null` result is treated as missing.
pub fn extract_result(body: &[u8]) -> UpstreamResult<&RawValue> {
    let trimmed = body.trim_ascii();

    // Structs also deserialize from arrays; only an object can carry `result`.
    if !trimmed.starts_with(b"{") {
        serde_json::from_slice::<IgnoredAny>(trimmed).map_err(UpstreamError::InvalidResponse)?;
        return Err(UpstreamError::MissingResult);
    }

    let envelope: RpcEnvelope<'_> =
        serde_json::from_slice(trimmed).map_err(UpstreamError::InvalidResponse)?;
    envelope.result.ok_or(UpstreamError::MissingResult)
}

/// HTTP client for rippled JSON-RPC endpoints.
#[derive(Clone)]
pub struct RippledClient {
    http: reqwest::Client,
    timeout_secs: u64,
}

impl RippledClient {
    /// Create a client with pooled connections and the configured timeouts.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> UpstreamResult<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .user_agent(concat!("rippled-passthrough/", env!("CARGO_PKG_VERSION")));

        if !upstream.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http = builder.build().map_err(UpstreamError::Transport)?;

        Ok(Self {
            http,
            timeout_secs: timeouts.upstream_secs,
        })
    }

    /// Call `method` on `url` and return the full upstream response body.
    pub async fn call_raw(&self, url: &Url, method: &str, params: &[u8]) -> UpstreamResult<Bytes> {
        let body = build_request_body(method, params)?;

        let response = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;

        tracing::debug!(
            upstream = %url,
            method = %method,
            status = %status,
            bytes = bytes.len(),
            "Upstream responded"
        );

        Ok(bytes)
    }

    /// Call `method` and return only the raw `result` member.
    pub async fn call(&self, url: &Url, method: &str, params: &[u8]) -> UpstreamResult<Bytes> {
        let body = self.call_raw(url, method, params).await?;
        let result = extract_result(&body)?;
        Ok(Bytes::copy_from_slice(result.get().as_bytes()))
    }

    fn classify(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout(self.timeout_secs)
        } else {
            UpstreamError::Transport(error)
        }
    }
}

impl std::fmt::Debug for RippledClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RippledClient")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn body_json(method: &str, params: &[u8]) -> Value {
        serde_json::from_slice(&build_request_body(method, params).unwrap()).unwrap()
    }

    #[test]
    fn test_object_params_are_wrapped() {
        let body = body_json("ledger", br#"{"ledger_index":"validated"}"#);
        assert_eq!(
            body,
            json!({"method": "ledger", "params": [{"ledger_index": "validated"}]})
        );
    }

    #[test]
    fn test_empty_params() {
        assert_eq!(
            body_json("ledger_closed", b""),
            json!({"method": "ledger_closed", "params": [{}]})
        );
        assert_eq!(
            body_json("ledger_current", b" \n "),
            json!({"method": "ledger_current", "params": [{}]})
        );
    }

    #[test]
    fn test_array_params_pass_through() {
        let body = body_json("account_info", br#" [{"account":"rXYZ"}] "#);
        assert_eq!(
            body,
            json!({"method": "account_info", "params": [{"account": "rXYZ"}]})
        );
    }

    #[test]
    fn test_params_kept_verbatim() {
        let body = build_request_body("ledger", br#"{"b":1,  "a":2}"#).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains(r#"[{"b":1,  "a":2}]"#), "{}", text);
    }

    #[test]
    fn test_invalid_params() {
        let err = build_request_body("ledger", b"{not json").unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidParams(_)));
    }

    #[test]
    fn test_extract_result_verbatim() {
        let body = br#"{"result":{"status":"success","ledger_index": 42},"id":1}"#;
        let result = extract_result(body).unwrap();
        assert_eq!(result.get(), r#"{"status":"success","ledger_index": 42}"#);
    }

    #[test]
    fn test_extract_rippled_error_result() {
        let body = br#"{"result":{"error":"unknownCmd","error_code":32,"status":"error"}}"#;
        let result = extract_result(body).unwrap();
        assert!(result.get().contains("unknownCmd"));
    }

    #[test]
    fn test_extract_missing_result() {
        assert!(matches!(
            extract_result(br#"{"error":"boom"}"#),
            Err(UpstreamError::MissingResult)
        ));
        assert!(matches!(
            extract_result(br#"{"result":null}"#),
            Err(UpstreamError::MissingResult)
        ));
        assert!(matches!(
            extract_result(br#"[{"status":"success"}]"#),
            Err(UpstreamError::MissingResult)
        ));
    }

    #[test]
    fn test_extract_invalid_json() {
        assert!(matches!(
            extract_result(b"<html>502 Bad Gateway</html>"),
            Err(UpstreamError::InvalidResponse(_))
        ));
    }
}
