//! Request-time base URL extraction.
//!
//! File references are stored as relative `/uploads/...` paths; absolute
//! URLs are materialized only at the response boundary, from the scheme
//! and host of the request being answered. The same record therefore
//! resolves differently depending on which host served the request.

use axum::extract::FromRequestParts;
use axum::http::header::HOST;
use axum::http::request::Parts;

/// The `scheme://host` prefix of the current request.
///
/// Use as an extractor in any handler that returns file URLs:
///
/// ```ignore
/// async fn handler(base: RequestBase) -> ... {
///     let url = base.join("/uploads/file.png");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequestBase(String);

impl RequestBase {
    /// Prefix a stored relative path with the request's scheme and host.
    pub fn join(&self, rel_path: &str) -> String {
        format!("{}{rel_path}", self.0)
    }

    /// Like [`join`](Self::join), passing `None` through.
    pub fn join_opt(&self, rel_path: Option<&str>) -> Option<String> {
        rel_path.map(|p| self.join(p))
    }
}

impl<S> FromRequestParts<S> for RequestBase
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        // Honor a reverse proxy's forwarded scheme; plain HTTP otherwise.
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http");

        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");

        Ok(RequestBase(format!("{scheme}://{host}")))
    }
}
