//! Response construction for relayed upstream replies.
//!
//! # Responsibilities
//! - Relay a successful upstream body as `200` JSON
//! - Relay binary media with its status and content type
//! - Define the failure envelope and the fixed 404 reply
//!
//! # Design Decisions
//! - JSON bodies are relayed byte-for-byte, never re-serialized
//! - A non-JSON success body is wrapped as a JSON string

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Plain-text body of every unmatched request.
pub const NOT_FOUND_MESSAGE: &str = "Page not found.";

/// Body of a failed proxied call.
///
/// `detail` is the upstream's own explanation, copied unchanged when the
/// upstream answered with one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A buffered upstream reply.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// `200` with the upstream JSON body unchanged.
pub fn json_relay(body: Bytes) -> Response {
    if serde_json::from_slice::<serde::de::IgnoredAny>(&body).is_ok() {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response()
    } else {
        let text = String::from_utf8_lossy(&body).into_owned();
        (StatusCode::OK, Json(serde_json::Value::String(text))).into_response()
    }
}

/// Upstream status, content type and bytes, as received.
pub fn binary_relay(reply: UpstreamReply) -> Response {
    let mut response = Response::new(Body::from(reply.body));
    *response.status_mut() = reply.status;
    if let Some(content_type) = reply.content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
}

/// The fixed 404 reply.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    #[tokio::test]
    async fn json_body_is_relayed_verbatim() {
        let raw = Bytes::from_static(br#"{"success": true,  "images": []}"#);
        let response = json_relay(raw.clone());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_of(response).await, raw);
    }

    #[tokio::test]
    async fn plain_text_body_is_wrapped() {
        let response = json_relay(Bytes::from_static(b"ok"));
        assert_eq!(body_of(response).await, Bytes::from_static(b"\"ok\""));
    }

    #[tokio::test]
    async fn binary_relay_keeps_status_and_type() {
        let response = binary_relay(UpstreamReply {
            status: StatusCode::OK,
            content_type: Some(HeaderValue::from_static("image/png")),
            body: Bytes::from_static(&[0x89, b'P', b'N', b'G']),
        });
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(body_of(response).await.len(), 4);
    }
}
