//! Engine-neutral request and response values.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::{StatusCode, Uri};

use crate::passthrough::cors::access_control_request_headers;

/// Name of the correlation header set on requests and echoed on responses.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// `application/json; charset=utf-8`
pub const CONTENT_TYPE_JSON_UTF8: &str = "application/json; charset=utf-8";

/// What the handler needs from an inbound request, whichever engine accepted it.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// HTTP method as received.
    pub http_method: String,
    /// The `{rippled_method}` path variable as received.
    pub rippled_method: String,
    /// Decoded query pairs, in order.
    pub query: Vec<(String, String)>,
    /// Value of `Access-Control-Request-Headers`, if sent.
    pub access_control_request_headers: Option<String>,
    /// Value of `X-Request-ID`, if sent or assigned by the engine.
    pub request_id: Option<String>,
    /// Raw request body.
    pub body: Bytes,
}

impl ApiRequest {
    /// Collect the fields the handler needs from HTTP request parts.
    pub fn from_parts(
        http_method: &str,
        rippled_method: impl Into<String>,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Self {
        let query = uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        let request_id = headers
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            http_method: http_method.to_string(),
            rippled_method: rippled_method.into(),
            query,
            access_control_request_headers: access_control_request_headers(headers),
            request_id,
            body,
        }
    }

    /// First value of query parameter `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// What the handler wants written back, whichever engine writes it.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    /// Empty response with the given headers.
    pub fn empty(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            status,
            headers,
            body: Bytes::new(),
        }
    }

    /// JSON response; sets the content type.
    pub fn json(status: StatusCode, mut headers: HeaderMap, body: Bytes) -> Self {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON_UTF8));
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Convert into an `http::Response` with any body type built from bytes.
    pub fn into_http<B: From<Bytes>>(self) -> http::Response<B> {
        let mut response = http::Response::new(B::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
