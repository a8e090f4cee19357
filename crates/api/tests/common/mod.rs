//! Shared helpers for HTTP-level integration tests.
//!
//! Tests drive the full router through `tower::ServiceExt::oneshot`, so
//! the whole middleware stack is exercised without a TCP listener.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use assetforge_api::auth::jwt::JwtConfig;
use assetforge_api::config::ServerConfig;
use assetforge_api::files::UploadStore;
use assetforge_api::router::build_app_router;
use assetforge_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a per-test upload
/// directory under the system temp dir.
pub fn test_config() -> ServerConfig {
    let uploads_dir: PathBuf = std::env::temp_dir().join(format!(
        "assetforge-test-uploads-{}",
        uuid::Uuid::new_v4()
    ));

    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        uploads_dir,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
///
/// This mirrors the router construction in `main.rs`, so integration
/// tests exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let files = Arc::new(UploadStore::new(config.uploads_dir.clone()));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        files,
    };

    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PATCH request with a JSON body.
pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a request with a multipart body built by [`MultipartForm`].
pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    form: MultipartForm,
) -> Response<Body> {
    let (content_type, body) = form.finish();
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a standard `{error, code}` error body with the given status.
pub async fn assert_error(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert!(json["error"].is_string(), "error body: {json}");
    assert!(json["code"].is_string(), "error body: {json}");
    json
}

/// Incrementally built multipart/form-data request body.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("----assetforge-test-{}", uuid::Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Close the body and return the content-type header plus bytes.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

/// Register a user through the API, returning their id.
pub async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let form = MultipartForm::new()
        .text("name", "Seed User")
        .text("email", email)
        .text("password", "hunter2hunter2")
        .file("profile_photo", "avatar.png", b"png-bytes");
    let response = send_multipart(app, Method::POST, "/api/users", form).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a project through the API, returning its id.
pub async fn seed_project(pool: &PgPool, name: &str, owner_id: i64) -> i64 {
    let app = build_test_app(pool.clone());
    let form = MultipartForm::new()
        .text("name", name)
        .text("owner_id", &owner_id.to_string());
    let response = send_multipart(app, Method::POST, "/api/projects", form).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a sound asset through the API, returning its id.
pub async fn seed_sound_asset(pool: &PgPool, name: &str, owner_id: i64, project_id: i64) -> i64 {
    let app = build_test_app(pool.clone());
    let form = MultipartForm::new()
        .text("type", "sound")
        .text("name", name)
        .text("description", "A seeded sound")
        .text("tags", "seed,test")
        .text("owner_id", &owner_id.to_string())
        .text("project_id", &project_id.to_string())
        .text("format", "wav")
        .text("sound_type", "effect")
        .text("duration", "2.5")
        .text("bitrate", "320")
        .file("file", "boom.wav", b"wav-bytes");
    let response = send_multipart(app, Method::POST, "/api/assets", form).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
