//! In-memory stand-in for the plant tracker API, for running the front end
//! locally without the real backend.
//!
//! ```text
//! cargo run --example mock_upstream            # listens on 127.0.0.1:8000
//! API_BASE_URL=http://127.0.0.1:8000 cargo run
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

#[derive(Clone)]
struct StoredImage {
    id: String,
    plant_id: String,
    filename: String,
    uploaded_at: String,
    content_type: String,
    bytes: Bytes,
}

#[derive(Clone, Default)]
struct Store {
    images: Arc<Mutex<Vec<StoredImage>>>,
}

impl Store {
    fn by_id(&self, id: &str) -> Option<StoredImage> {
        let images = self.images.lock().ok()?;
        images.iter().find(|image| image.id == id).cloned()
    }
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn upload(
    State(store): State<Store>,
    Path(plant_id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let mut file = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let extension = field
            .file_name()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| format!(".{ext}"))
            .unwrap_or_default();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        match field.bytes().await {
            Ok(bytes) => file = Some((extension, content_type, bytes)),
            Err(e) => return detail(StatusCode::BAD_REQUEST, &e.body_text()),
        }
    }

    let Some((extension, content_type, bytes)) = file else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "file is required");
    };

    let id = uuid::Uuid::new_v4().to_string();
    let image = StoredImage {
        filename: format!("{id}{extension}"),
        id: id.clone(),
        plant_id,
        uploaded_at: stamp(),
        content_type,
        bytes,
    };
    let filename = image.filename.clone();
    match store.images.lock() {
        Ok(mut images) => images.push(image),
        Err(_) => return detail(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned"),
    }
    tracing::info!(image_id = %id, filename = %filename, "Stored upload");

    Json(json!({ "success": true, "image_id": id, "filename": filename })).into_response()
}

async fn list_images(State(store): State<Store>, Path(plant_id): Path<String>) -> Response {
    let images: Vec<_> = match store.images.lock() {
        Ok(images) => images
            .iter()
            .filter(|image| image.plant_id == plant_id)
            .map(|image| {
                json!({
                    "id": image.id,
                    "filename": image.filename,
                    "uploaded_at": image.uploaded_at,
                })
            })
            .collect(),
        Err(_) => return detail(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned"),
    };
    Json(json!({ "success": true, "images": images })).into_response()
}

async fn analyze(State(store): State<Store>, Path(image_id): Path<String>) -> Response {
    match store.by_id(&image_id) {
        Some(_) => Json(json!({
            "success": true,
            "analysis": {
                "health_score": 85,
                "growth_stage": "vegetative",
                "recommendations": ["Water twice a week"],
            }
        }))
        .into_response(),
        None => detail(StatusCode::NOT_FOUND, "Image not found"),
    }
}

#[derive(Deserialize)]
struct TimelapseRequest {
    plant_id: String,
    start_date: Option<String>,
    end_date: Option<String>,
}

/// Upload timestamp in the backend's ISO-8601 form.
fn stamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

// Bounds compare as strings against the RFC 3339 upload stamps, so a bare
// `end_date` day excludes uploads made later that day.
fn timelapse_frames(images: &[StoredImage], request: &TimelapseRequest) -> Vec<String> {
    let mut matching: Vec<&StoredImage> = images
        .iter()
        .filter(|image| image.plant_id == request.plant_id)
        .filter(|image| {
            request
                .start_date
                .as_deref()
                .map_or(true, |start| image.uploaded_at.as_str() >= start)
        })
        .filter(|image| {
            request
                .end_date
                .as_deref()
                .map_or(true, |end| image.uploaded_at.as_str() <= end)
        })
        .collect();
    matching.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at));
    matching.iter().map(|image| image.filename.clone()).collect()
}

async fn timelapse(State(store): State<Store>, Json(request): Json<TimelapseRequest>) -> Response {
    let frames = match store.images.lock() {
        Ok(images) => timelapse_frames(&images, &request),
        Err(_) => return detail(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned"),
    };
    if frames.is_empty() {
        return detail(
            StatusCode::BAD_REQUEST,
            "No images found for the specified criteria",
        );
    }

    let id = format!("timelapse_{}_{}.mp4", request.plant_id, uuid::Uuid::new_v4());
    tracing::info!(timelapse_id = %id, frames = frames.len(), "Built timelapse");
    Json(json!({
        "success": true,
        "timelapse_id": id,
        "url": format!("/static/timelapses/{id}"),
        "frames": frames,
    }))
    .into_response()
}

#[derive(Deserialize)]
struct ShareRequest {
    image_id: String,
    platform: String,
}

async fn share(State(store): State<Store>, Json(request): Json<ShareRequest>) -> Response {
    let Some(image) = store.by_id(&request.image_id) else {
        return detail(StatusCode::NOT_FOUND, "Image not found");
    };
    Json(json!({
        "success": true,
        "message": format!("Shared to {}", request.platform),
        "url": format!("/static/{}", image.filename),
    }))
    .into_response()
}

async fn static_file(State(store): State<Store>, Path(filename): Path<String>) -> Response {
    let found = store.images.lock().ok().and_then(|images| {
        images
            .iter()
            .find(|image| image.filename == filename)
            .map(|image| (image.content_type.clone(), image.bytes.clone()))
    });
    match found {
        Some((content_type, bytes)) => {
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "File not found"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_upstream=info".into()),
        )
        .init();

    let app = Router::new()
        .route("/api/plants/{plant_id}/upload", post(upload))
        .route("/api/plants/{plant_id}/images", get(list_images))
        .route("/api/analyze/{image_id}", get(analyze))
        .route("/api/timelapse/create", post(timelapse))
        .route("/api/share/sns", post(share))
        .route("/static/{filename}", get(static_file))
        .with_state(Store::default());

    let address = std::env::var("MOCK_UPSTREAM_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".into());
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %listener.local_addr()?, "Mock upstream listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(plant_id: &str, filename: &str, uploaded_at: &str) -> StoredImage {
        StoredImage {
            id: filename.to_string(),
            plant_id: plant_id.to_string(),
            filename: filename.to_string(),
            uploaded_at: uploaded_at.to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::new(),
        }
    }

    #[test]
    fn upload_stamp_is_rfc3339() {
        let stamp = stamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok(), "{stamp}");
    }

    #[test]
    fn timelapse_frames_filter_by_plant_and_dates_in_order() {
        let images = vec![
            stored("1", "c.png", "2024-06-20T08:00:00+00:00"),
            stored("1", "a.png", "2024-05-03T08:00:00+00:00"),
            stored("2", "x.png", "2024-06-01T08:00:00+00:00"),
            stored("1", "b.png", "2024-06-02T08:00:00+00:00"),
        ];

        let all = TimelapseRequest {
            plant_id: "1".into(),
            start_date: None,
            end_date: None,
        };
        assert_eq!(timelapse_frames(&images, &all), vec!["a.png", "b.png", "c.png"]);

        let june = TimelapseRequest {
            plant_id: "1".into(),
            start_date: Some("2024-06-01".into()),
            end_date: Some("2024-06-15".into()),
        };
        assert_eq!(timelapse_frames(&images, &june), vec!["b.png"]);
    }
}
