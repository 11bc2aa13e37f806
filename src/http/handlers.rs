//! Proxied route handlers.
//!
//! Each handler resolves its row of the routing table, forwards exactly one
//! upstream request, and answers with the relayed body or the route's 500
//! envelope.

use std::time::Instant;

use axum::body::Body;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};

use crate::error::{ProxyError, UpstreamError};
use crate::http::request::RequestId;
use crate::http::response::{binary_relay, json_relay, UpstreamReply};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::router::{ANALYZE, LIST_IMAGES, MEDIA, PLANT_UPLOAD, SHARE, TIMELAPSE, UPLOAD};
use crate::routing::{BodyMode, ProxyRoute, ReplyMode};
use crate::upstream::{plant_id_from_json, UploadForm};

/// `POST /api/upload`: plant id from the body, multipart or JSON.
pub async fn upload(
    State(state): State<AppState>,
    request_id: RequestId,
    request: Request,
) -> Response {
    let start = Instant::now();
    tracing::debug!(request_id = %request_id, route = %UPLOAD.name, "Relaying upload");
    let outcome = relay_upload(&state, request).await;
    finish(&UPLOAD, &request_id, start, outcome)
}

/// `POST /api/plants/{plant_id}/upload`: body streamed through unchanged.
pub async fn plant_upload(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(plant_id): Path<String>,
    request: Request,
) -> Response {
    proxy(&state, &PLANT_UPLOAD, &request_id, &[("plant_id", plant_id.as_str())], Some(request)).await
}

/// `GET /api/plants/{plant_id}/images`
pub async fn list_images(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(plant_id): Path<String>,
) -> Response {
    proxy(&state, &LIST_IMAGES, &request_id, &[("plant_id", plant_id.as_str())], None).await
}

/// `GET /api/analyze/{image_id}`
pub async fn analyze(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(image_id): Path<String>,
) -> Response {
    proxy(&state, &ANALYZE, &request_id, &[("image_id", image_id.as_str())], None).await
}

/// `POST /api/timelapse`
pub async fn timelapse(
    State(state): State<AppState>,
    request_id: RequestId,
    request: Request,
) -> Response {
    proxy(&state, &TIMELAPSE, &request_id, &[], Some(request)).await
}

/// `POST /api/share`
pub async fn share(
    State(state): State<AppState>,
    request_id: RequestId,
    request: Request,
) -> Response {
    proxy(&state, &SHARE, &request_id, &[], Some(request)).await
}

/// `GET /media/{filename}`: uploaded image files, relayed as binary.
pub async fn media(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(filename): Path<String>,
) -> Response {
    proxy(&state, &MEDIA, &request_id, &[("filename", filename.as_str())], None).await
}

async fn proxy(
    state: &AppState,
    route: &'static ProxyRoute,
    request_id: &RequestId,
    params: &[(&str, &str)],
    request: Option<Request>,
) -> Response {
    let start = Instant::now();
    tracing::debug!(
        request_id = %request_id,
        route = %route.name,
        method = %route.method,
        "Proxying request"
    );
    let outcome = forward(state, route, params, request).await;
    finish(route, request_id, start, outcome)
}

async fn forward(
    state: &AppState,
    route: &'static ProxyRoute,
    params: &[(&str, &str)],
    request: Option<Request>,
) -> Result<UpstreamReply, UpstreamError> {
    let url = state.upstream.url_for(route, params)?;

    let (body, content_type) = match (route.body, request) {
        (BodyMode::Passthrough, Some(request)) => {
            let content_type = request
                .headers()
                .get(header::CONTENT_TYPE)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static("application/json"));
            (request.into_body(), Some(content_type))
        }
        _ => (Body::empty(), None),
    };

    state
        .upstream
        .send(route.method.clone(), &url, body, content_type)
        .await
}

async fn relay_upload(state: &AppState, request: Request) -> Result<UpstreamReply, UpstreamError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| UpstreamError::Form(e.body_text()))?;
        let form = UploadForm::read(multipart).await?;
        let url = state
            .upstream
            .url_for(&UPLOAD, &[("plant_id", form.plant_id.as_str())])?;
        tracing::debug!(
            plant_id = %form.plant_id,
            filename = %form.file.filename,
            size = form.file.bytes.len(),
            "Re-posting upload form"
        );
        state.upstream.send_form(&url, form.into_form()?).await
    } else {
        let body = axum::body::to_bytes(request.into_body(), state.max_body_size)
            .await
            .map_err(|e| UpstreamError::Body(e.to_string()))?;
        let plant_id = plant_id_from_json(&body)?;
        let url = state
            .upstream
            .url_for(&UPLOAD, &[("plant_id", plant_id.as_str())])?;
        state
            .upstream
            .send(
                Method::POST,
                &url,
                Body::from(body),
                Some(HeaderValue::from_static("application/json")),
            )
            .await
    }
}

fn finish(
    route: &'static ProxyRoute,
    request_id: &RequestId,
    start: Instant,
    outcome: Result<UpstreamReply, UpstreamError>,
) -> Response {
    let response = match outcome {
        Ok(reply) => match route.reply {
            ReplyMode::Json => json_relay(reply.body),
            ReplyMode::Binary => binary_relay(reply),
        },
        Err(source) => {
            tracing::error!(
                request_id = %request_id,
                route = %route.name,
                error = %source,
                "Upstream error"
            );
            metrics::record_upstream_error(route.name);
            ProxyError::new(route.name, route.error_message, source).into_response()
        }
    };

    metrics::record_request(route.name, response.status().as_u16(), start);
    response
}
