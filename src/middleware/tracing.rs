// ABOUTME: Request tracing spans for correlation and structured logging
// ABOUTME: Each HTTP request gets a span carrying its method, path and x-request-id
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::body::Body;
use http::Request;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create a tracing span for HTTP requests
pub fn create_request_span(method: &str, path: &str) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = tracing::field::Empty,
    )
}

/// Span factory for `TraceLayer`, picks up the id set by `SetRequestIdLayer`
pub fn make_request_span(request: &Request<Body>) -> tracing::Span {
    let span = create_request_span(request.method().as_str(), request.uri().path());
    if let Some(id) = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        span.record("request_id", id);
    }
    span
}
