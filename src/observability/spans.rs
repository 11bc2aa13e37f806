//! Per-request tracing spans.

use axum::body::Body;
use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::http::request::X_REQUEST_ID;

/// Span carrying method, path and request id.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

/// HTTP trace layer using [`request_span`].
pub fn http_trace_layer(
) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, fn(&Request<Body>) -> Span> {
    TraceLayer::new_for_http().make_span_with(request_span as fn(&Request<Body>) -> Span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_builds_without_request_id() {
        let request = Request::builder()
            .uri("/api/share")
            .body(Body::empty())
            .unwrap();
        // No subscriber installed, so the span is disabled but must not panic.
        let _span = request_span(&request);
    }
}
