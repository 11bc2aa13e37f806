//! Integration tests for the proxied routes, static assets and 404 handling.

use axum::http::{Method, StatusCode};
use plant_tracker_web::http::{ErrorEnvelope, NOT_FOUND_MESSAGE};
use serde_json::json;

mod common;

use common::{client, json_reply, spawn_proxy, start_mock_upstream, test_config};

#[tokio::test]
async fn list_images_relays_upstream_body_verbatim() {
    let upstream = start_mock_upstream(|_| {
        json_reply(
            200,
            json!({"success": true, "images": [{"id": "a1", "filename": "a.png", "uploaded_at": "2024-05-01"}]}),
        )
    })
    .await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let res = client()
        .get(proxy.url("/api/plants/3/images"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["images"][0]["id"], "a1");

    let calls = upstream.calls();
    assert_eq!(calls.len(), 1, "exactly one upstream request");
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/api/plants/3/images");
}

#[tokio::test]
async fn upstream_error_status_becomes_500_envelope() {
    let upstream =
        start_mock_upstream(|_| json_reply(404, json!({"detail": "Plant not found"}))).await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let res = client()
        .get(proxy.url("/api/plants/99/images"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: ErrorEnvelope = res.json().await.unwrap();
    assert_eq!(envelope.error, "Failed to load image list.");
    assert!(envelope.details.contains("Plant not found"), "{}", envelope.details);
    assert_eq!(envelope.detail.as_deref(), Some("Plant not found"));
}

#[tokio::test]
async fn unreachable_upstream_becomes_500_envelope() {
    let dead = common::unused_addr().await;
    let proxy = spawn_proxy(test_config(&format!("http://{dead}"))).await;

    let res = client()
        .get(proxy.url("/api/analyze/img-1"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: ErrorEnvelope = res.json().await.unwrap();
    assert_eq!(envelope.error, "Failed to analyze image.");
    assert!(!envelope.details.is_empty());
    assert_eq!(envelope.detail, None);
}

#[tokio::test]
async fn unknown_paths_and_methods_are_404() {
    let upstream = start_mock_upstream(|_| json_reply(200, json!({}))).await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;
    let client = client();

    for (method, path) in [
        (Method::GET, "/api/nonexistent"),
        (Method::GET, "/does/not/exist.html"),
        (Method::GET, "/api/share"),
        (Method::DELETE, "/api/plants/1/images"),
    ] {
        let res = client
            .request(method.clone(), proxy.url(path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{method} {path}");
        assert_eq!(res.text().await.unwrap(), NOT_FOUND_MESSAGE);
    }

    assert!(upstream.calls().is_empty(), "404s never reach the upstream");
}

#[tokio::test]
async fn json_upload_is_routed_by_plant_id() {
    let upstream = start_mock_upstream(|_| json_reply(200, json!({"image_id": "new-1"}))).await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let res = client()
        .post(proxy.url("/api/upload"))
        .json(&json!({"plantId": 7, "notes": "first leaf"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let calls = upstream.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].path, "/api/plants/7/upload");
    assert_eq!(calls[0].json(), json!({"plantId": 7, "notes": "first leaf"}));
}

#[tokio::test]
async fn multipart_upload_is_reposted_as_file_form() {
    let upstream = start_mock_upstream(|_| json_reply(200, json!({"image_id": "new-2"}))).await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let form = reqwest::multipart::Form::new()
        .text("plantId", "4")
        .text("notes", "after repotting")
        .part(
            "file",
            reqwest::multipart::Part::bytes(b"\x89PNG fake".to_vec())
                .file_name("leaf.png")
                .mime_str("image/png")
                .unwrap(),
        );
    let res = client()
        .post(proxy.url("/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["image_id"], "new-2");

    let calls = upstream.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/api/plants/4/upload");
    let content_type = calls[0].content_type.clone().unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
    let raw = String::from_utf8_lossy(&calls[0].body);
    assert!(raw.contains("name=\"file\""));
    assert!(raw.contains("filename=\"leaf.png\""));
    assert!(raw.contains("after repotting"));
    assert!(!raw.contains("name=\"plantId\""));
}

#[tokio::test]
async fn upload_without_plant_id_fails_without_upstream_call() {
    let upstream = start_mock_upstream(|_| json_reply(200, json!({}))).await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let res = client()
        .post(proxy.url("/api/upload"))
        .json(&json!({"notes": "orphan"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: ErrorEnvelope = res.json().await.unwrap();
    assert_eq!(envelope.error, "Failed to upload image.");
    assert!(upstream.calls().is_empty());
}

#[tokio::test]
async fn plant_upload_streams_body_through() {
    let upstream = start_mock_upstream(|_| json_reply(200, json!({"image_id": "s-1"}))).await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(b"jpeg bytes".to_vec()).file_name("x.jpg"),
    );
    let res = client()
        .post(proxy.url("/api/plants/12/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let calls = upstream.calls();
    assert_eq!(calls[0].path, "/api/plants/12/upload");
    assert!(calls[0]
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data; boundary=")));
    assert!(String::from_utf8_lossy(&calls[0].body).contains("jpeg bytes"));
}

#[tokio::test]
async fn share_posts_same_body_to_sns_endpoint() {
    let upstream =
        start_mock_upstream(|_| json_reply(200, json!({"message": "Shared", "url": "https://x"})))
            .await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let res = client()
        .post(proxy.url("/api/share"))
        .json(&json!({"image_id": "a1", "platform": "instagram"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let calls = upstream.calls();
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].path, "/api/share/sns");
    assert_eq!(calls[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(calls[0].json(), json!({"image_id": "a1", "platform": "instagram"}));
}

#[tokio::test]
async fn share_failure_uses_share_message() {
    let upstream =
        start_mock_upstream(|_| json_reply(400, json!({"detail": "Unsupported platform"}))).await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let res = client()
        .post(proxy.url("/api/share"))
        .json(&json!({"image_id": "a1", "platform": "myspace"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: ErrorEnvelope = res.json().await.unwrap();
    assert_eq!(envelope.error, "Failed to share to social media.");
    assert!(envelope.details.contains("Unsupported platform"));
}

#[tokio::test]
async fn timelapse_goes_to_create_endpoint() {
    let upstream = start_mock_upstream(|_| {
        json_reply(200, json!({"timelapse_id": "t1", "url": "/static/timelapses/t1"}))
    })
    .await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let res = client()
        .post(proxy.url("/api/timelapse"))
        .json(&json!({"plant_id": "1"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let calls = upstream.calls();
    assert_eq!(calls[0].path, "/api/timelapse/create");
    assert_eq!(calls[0].json(), json!({"plant_id": "1"}));
}

#[tokio::test]
async fn non_json_success_body_is_wrapped_as_string() {
    let upstream = start_mock_upstream(|_| {
        axum::response::Response::builder()
            .status(200)
            .body("ok".into())
            .unwrap()
    })
    .await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let res = client()
        .get(proxy.url("/api/analyze/img-1"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn media_is_relayed_as_binary() {
    let upstream = start_mock_upstream(|_| {
        axum::response::Response::builder()
            .status(200)
            .header("content-type", "image/png")
            .body(vec![0x89, b'P', b'N', b'G'].into())
            .unwrap()
    })
    .await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let res = client()
        .get(proxy.url("/media/leaf.png"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "image/png");
    assert_eq!(res.bytes().await.unwrap().as_ref(), &[0x89, b'P', b'N', b'G']);
    assert_eq!(upstream.calls()[0].path, "/static/leaf.png");
}

#[tokio::test]
async fn index_and_assets_are_served_from_static_dir() {
    let upstream = start_mock_upstream(|_| json_reply(200, json!({}))).await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;
    let client = client();

    let res = client.get(proxy.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(res.text().await.unwrap().contains("Plant Growth Tracker"));

    let res = client.get(proxy.url("/styles.css")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/css"));

    assert!(upstream.calls().is_empty());
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let upstream = start_mock_upstream(|_| json_reply(200, json!({"images": []}))).await;
    let proxy = spawn_proxy(test_config(&upstream.base_url())).await;

    let res = client()
        .get(proxy.url("/api/plants/1/images"))
        .send()
        .await
        .unwrap();
    assert!(res.headers().contains_key("x-request-id"));

    let res = client()
        .get(proxy.url("/api/plants/1/images"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");
}
