//! Proxy error types.
//!
//! Every failure on a proxied route ends up as a [`ProxyError`], which renders
//! the fixed `500` envelope `{ "error": ..., "details": ... }`, plus the
//! upstream's `detail` when it sent one.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::http::response::ErrorEnvelope;
use crate::routing::{RouteName, TemplateError};

/// Anything that can go wrong between receiving a request and relaying the
/// upstream reply.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream url: {0}")]
    Url(#[from] TemplateError),

    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("upstream responded with status {status}{}", detail_suffix(.detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("invalid upload form: {0}")]
    Form(String),

    #[error("request is missing '{0}'")]
    MissingField(&'static str),
}

impl UpstreamError {
    /// Explanation sent by the upstream with a non-2xx reply.
    pub fn upstream_detail(&self) -> Option<&str> {
        match self {
            UpstreamError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

impl From<hyper_util::client::legacy::Error> for UpstreamError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        UpstreamError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport(err.to_string())
    }
}

/// A failed proxied request, tied to the route it happened on.
#[derive(Debug, Error)]
#[error("{message} ({route}): {source}")]
pub struct ProxyError {
    pub route: RouteName,
    pub message: &'static str,
    #[source]
    pub source: UpstreamError,
}

impl ProxyError {
    pub fn new(route: RouteName, message: &'static str, source: UpstreamError) -> Self {
        Self {
            route,
            message,
            source,
        }
    }

    /// The body sent back to the caller.
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.message.to_string(),
            details: self.source.to_string(),
            detail: self.source.upstream_detail().map(str::to_string),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.envelope())).into_response()
    }
}

/// Pull a human-readable error message out of a JSON error body.
///
/// `keys` are tried in order. String values are returned as-is; other JSON
/// values (FastAPI validation lists, for instance) are returned serialized.
pub fn error_detail(body: &[u8], keys: &[&str]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    keys.iter().find_map(|key| match value.get(*key)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}
