//! Single-origin CORS policy and the response envelope that applies it.
//!
//! `tower_http::cors::CorsLayer` answers disallowed preflights with a normal 200;
//! this service rejects them with 403 instead, so the policy is applied by a small
//! `axum` middleware ([`envelope`]).

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{header, HeaderMap, HeaderValue, Method, StatusCode};

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
pub const MAX_AGE_SECONDS: &str = "86400";

/// Exact-match policy for one allowed origin.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origin: HeaderValue,
}

impl CorsPolicy {
    pub fn new(allowed_origin: &str) -> Result<Self, http::header::InvalidHeaderValue> {
        Ok(Self {
            allowed_origin: HeaderValue::from_str(allowed_origin)?,
        })
    }

    pub fn allows(&self, origin: Option<&str>) -> bool {
        origin.is_some_and(|o| o.as_bytes() == self.allowed_origin.as_bytes())
    }

    /// CORS headers for a request from `origin`; empty unless it is the allowed origin.
    pub fn headers_for(&self, origin: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if !self.allows(origin) {
            return headers;
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allowed_origin.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(MAX_AGE_SECONDS),
        );
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        headers
    }

    /// Answer an `OPTIONS` request: 204 with CORS headers, or a bare 403.
    pub fn preflight(&self, origin: Option<&str>) -> Response {
        if !self.allows(origin) {
            tracing::warn!(origin = ?origin, "Rejected CORS preflight");
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }
        let mut resp = Response::new(Body::empty());
        *resp.status_mut() = StatusCode::NO_CONTENT;
        *resp.headers_mut() = self.headers_for(origin);
        resp
    }

    /// Merge CORS headers for `origin` over the response's own headers.
    /// Status and body are left untouched.
    pub fn attach(&self, mut resp: Response, origin: Option<&str>) -> Response {
        let headers = resp.headers_mut();
        for (name, value) in self.headers_for(origin).iter() {
            headers.insert(name.clone(), value.clone());
        }
        resp
    }
}

/// Middleware run in front of every route: preflight handling, then CORS headers
/// on whatever the router produced.
pub async fn envelope(State(cors): State<CorsPolicy>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if req.method() == Method::OPTIONS {
        return cors.preflight(origin.as_deref());
    }

    let resp = next.run(req).await;
    cors.attach(resp, origin.as_deref())
}
