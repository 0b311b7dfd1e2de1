//! Router-level tests driven through `tower::ServiceExt::oneshot`.
//!
//! The database pool is created lazily and never actually connected: these
//! tests only exercise routes that stay away from Postgres (health, auth
//! guarding, the template download, media upload and serving, and the
//! gateway-not-configured guard).

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use landing_hub_api::config::AppConfig;
use landing_hub_api::routes::build_router;
use landing_hub_api::state::AppState;
use landing_hub_core::auth::token::issue_token;
use landing_hub_core::events::bus::EventBus;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

const JWT_SECRET: &str = "router-test-secret";

fn test_app() -> (axum::Router, TempDir) {
    let media_dir = TempDir::new().expect("create media dir");

    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 3030,
        database_url: "postgres://postgres@localhost/landing_hub_test".to_string(),
        db_max_connections: 1,
        db_min_connections: 0,
        jwt_secret: JWT_SECRET.to_string(),
        event_bus_capacity: 64,
        log_level: "info".to_string(),
        media_root: media_dir.path().to_path_buf(),
        public_base_url: "http://localhost:3030".to_string(),
        whatsapp: None,
        google: None,
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    let state = AppState::new(pool, config, EventBus::new(64));

    (build_router(state), media_dir)
}

fn bearer() -> String {
    let token = issue_token(JWT_SECRET, Uuid::new_v4(), "admin@example.com").unwrap();
    format!("Bearer {token}")
}

async fn response_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("read body").to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

#[tokio::test]
async fn ping_answers_without_a_database() {
    let (app, _media) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn admin_routes_reject_missing_and_malformed_tokens() {
    let (app, _media) = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/contacts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["error"]["type"], "unauthorized");
    assert_eq!(body["error"]["statusCode"], 401);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/contacts")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn template_download_is_a_csv_attachment() {
    let (app, _media) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/contacts/template.csv")
                .header(header::AUTHORIZATION, bearer())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("plantilla_contactos.csv"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("nombre,apellido,telefono"));
    assert!(text.contains("+59165258002"));
}

#[tokio::test]
async fn broadcasts_are_unavailable_without_gateway_configuration() {
    let (app, _media) = test_app();

    let payload = json!({
        "contactIds": [Uuid::new_v4()],
        "text": "Hola {nombre}",
        "delaySeconds": 2,
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/broadcasts")
                .header(header::AUTHORIZATION, bearer())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["error"]["type"], "notConfigured");
}

#[tokio::test]
async fn unknown_broadcast_snapshots_are_not_found() {
    let (app, _media) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/v1/broadcasts/{}", Uuid::new_v4()))
                .header(header::AUTHORIZATION, bearer())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn multipart_request(uri: &str, boundary: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, bearer())
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn uploaded_assets_are_served_back_under_media() {
    let (app, _media) = test_app();

    let boundary = "X-ROUTER-TEST";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"category\"\r\n\r\nbanner\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"hero.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"png-bytes");
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app
        .clone()
        .oneshot(multipart_request("/v1/assets", boundary, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let stored = response_json(response.into_body()).await;
    let url = stored["url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:3030/media/landing/banner-"));
    assert_eq!(stored["mimeType"], "image/png");

    // The URL path maps straight onto the /media file routes.
    let path = url.strip_prefix("http://localhost:3030").unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"png-bytes");
}

#[tokio::test]
async fn asset_uploads_reject_unknown_categories() {
    let (app, _media) = test_app();

    let boundary = "X-ROUTER-TEST";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"category\"\r\n\r\nsidebar\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"x.png\"\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"bytes");
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app
        .oneshot(multipart_request("/v1/assets", boundary, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["error"]["type"], "badRequest");
}

#[tokio::test]
async fn broadcast_media_uploads_keep_name_and_mime() {
    let (app, _media) = test_app();

    let boundary = "X-ROUTER-TEST";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"promo 2025.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"%PDF-1.4");
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app
        .oneshot(multipart_request("/v1/broadcasts/media", boundary, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = response_json(response.into_body()).await;
    assert!(stored["url"]
        .as_str()
        .unwrap()
        .contains("/media/whatsapp_media/"));
    assert!(stored["fileName"].as_str().unwrap().ends_with("promo_2025.pdf"));
    assert_eq!(stored["mimeType"], "application/pdf");
}
