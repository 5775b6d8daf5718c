//! Per-request plumbing: request ids, spans, metrics and path ids.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is kept; otherwise a UUID v4 is generated
//! - Metrics are recorded after the response is produced so the status is known

use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::http::response::ApiError;
use crate::observability::metrics;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a UUID v4 request id for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Route label for a request: the matched template, else the raw path.
pub fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned())
}

/// Span opened for every request by the trace layer.
pub fn make_span(request: &axum::http::Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    tracing::info_span!(
        "request",
        method = %request.method(),
        route = %route_label(request),
        request_id = %request_id,
    )
}

/// Middleware counting every request by method, route and status.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = route_label(&request);

    let response = next.run(request).await;

    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}

/// Middleware replacing the timeout layer's bodiless 408 with a JSON error.
pub async fn timeout_as_json(request: Request, next: Next) -> Response {
    let route = route_label(&request);
    let response = next.run(request).await;
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    tracing::warn!(route = %route, "Request timed out");
    ApiError::Timeout.into_response()
}

/// Parse a path id the way a lenient integer parser would.
///
/// Leading whitespace and a sign are accepted, then the longest run of
/// digits is read and anything after it ignored (`"12abc"` is 12). A `0x`
/// or `0X` prefix switches to hexadecimal (`"0x2"` is 2).
/// Returns `None` when no digits lead, the value is negative, or it overflows.
pub fn parse_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (digits, radix) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (&unsigned[2..], 16),
        _ => (unsigned, 10),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 || negative {
        return None;
    }
    u64::from_str_radix(&digits[..end], radix).ok()
}
