//! Custom extractors
//!
//! [`PathKey`] yields the literal remainder of the request path after the
//! static prefix of the matched wildcard route, e.g. `abc%20d` for
//! `GET /r/abc%20d` on `/r/*id`. The key is not percent-decoded.

use axum::{
    extract::{FromRequestParts, MatchedPath},
    http::request::Parts,
};

use crate::error::ServerError;

/// Lookup key taken from the raw request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathKey(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for PathKey
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let matched = parts
            .extensions
            .get::<MatchedPath>()
            .ok_or_else(|| ServerError::InternalError("route has no matched path".to_string()))?;

        let prefix = route_prefix(matched.as_str());
        parts
            .uri
            .path()
            .strip_prefix(prefix)
            .map(|key| PathKey(key.to_string()))
            .ok_or_else(|| ServerError::NotFound(parts.uri.path().to_string()))
    }
}

/// Static part of a route pattern, up to its wildcard segment
pub(super) fn route_prefix(pattern: &str) -> &str {
    match pattern.find('*') {
        Some(idx) => &pattern[..idx],
        None => pattern,
    }
}
