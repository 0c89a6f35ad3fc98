//! Upstream endpoint resolution.
//!
//! Order: `jrpcURL` query parameter, then the environment variable, then the
//! configured default. Candidates are trimmed; the first non-empty one wins.

use url::Url;

use crate::upstream::types::{UpstreamError, UpstreamResult};

/// Query parameter overriding the upstream per request.
pub const JRPC_URL_QUERY_PARAM: &str = "jrpcURL";

/// Environment variable consulted when the query parameter is absent.
pub const JSON_RPC_URL_ENV: &str = "JSON_RPC_URL";

/// First candidate that is non-empty after trimming, trimmed.
pub fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|c| !c.is_empty())
}

/// Parse an endpoint, accepting only absolute http(s) URLs.
pub fn parse_endpoint(raw: &str) -> UpstreamResult<Url> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|e| UpstreamError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UpstreamError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Resolve the endpoint from explicit candidates.
pub fn resolve_endpoint(
    query: Option<&str>,
    env: Option<&str>,
    default: &str,
) -> UpstreamResult<Url> {
    let chosen = first_non_empty([query, env, Some(default)]).unwrap_or(default);
    parse_endpoint(chosen)
}

/// Resolves the upstream for each request, reading the environment every time.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    env_var: String,
    default_url: String,
}

impl EndpointResolver {
    pub fn new(env_var: impl Into<String>, default_url: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            default_url: default_url.into(),
        }
    }

    pub fn resolve(&self, query: Option<&str>) -> UpstreamResult<Url> {
        let env = std::env::var(&self.env_var).ok();
        resolve_endpoint(query, env.as_deref(), &self.default_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAINNET: &str = "https://s1.ripple.com:51234/";

    #[test]
    fn test_query_wins() {
        let url = resolve_endpoint(
            Some(" http://query:5005 "),
            Some("http://env:5005"),
            MAINNET,
        )
        .unwrap();
        assert_eq!(url.as_str(), "http://query:5005/");
    }

    #[test]
    fn test_env_used_when_query_blank() {
        let url = resolve_endpoint(Some("   "), Some("http://env:5005"), MAINNET).unwrap();
        assert_eq!(url.host_str(), Some("env"));

        let url = resolve_endpoint(None, Some("http://env:5005"), MAINNET).unwrap();
        assert_eq!(url.host_str(), Some("env"));
    }

    #[test]
    fn test_default_when_nothing_set() {
        let url = resolve_endpoint(None, Some(""), MAINNET).unwrap();
        assert_eq!(url.as_str(), MAINNET);
    }

    #[test]
    fn test_invalid_query_is_an_error() {
        let err = resolve_endpoint(Some("not a url"), None, MAINNET).unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidUrl { .. }));

        let err = resolve_endpoint(Some("ws://s1.ripple.com:51233"), None, MAINNET).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ws'"));
    }
}
