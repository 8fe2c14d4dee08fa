//! Shared test harness: app construction and request helpers.
//!
//! Builds the production router via `build_app_router` so integration tests
//! exercise the same middleware stack (CORS, request ID, timeout, tracing,
//! panic recovery) that production uses, with in-memory session and object
//! storage doubles instead of Redis/S3.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use drawstory_api::auth::jwt::JwtConfig;
use drawstory_api::config::{GoogleOAuthConfig, ServerConfig, StorageConfig};
use drawstory_api::email::Mailer;
use drawstory_api::router::build_app_router;
use drawstory_api::state::AppState;
use drawstory_cache::InMemorySessionStore;
use drawstory_cloud::InMemoryStorage;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            token_expiry_hours: 24,
        },
        google: GoogleOAuthConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
        },
        storage: StorageConfig {
            bucket: "test-bucket".to_string(),
            region: "test-region".to_string(),
        },
        redis_url: "redis://unused-in-tests".to_string(),
        smtp: None,
    }
}

/// Build the full application router with in-memory providers.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        sessions: Arc::new(InMemorySessionStore::new()),
        storage: Arc::new(InMemoryStorage::new()),
        mailer: Arc::new(Mailer::new(None)),
    };
    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("request should not fail")
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    request_json(app, "GET", uri, Some(token), None).await
}

/// Send a JSON POST request, optionally authenticated.
pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Response<Body> {
    request_json(app, "POST", uri, token, Some(body)).await
}

/// Send a JSON PUT request, optionally authenticated.
pub async fn put_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
    request_json(app, "PUT", uri, token, Some(body)).await
}

/// Send a DELETE request with a Bearer token.
pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    request_json(app, "DELETE", uri, Some(token), None).await
}

async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.clone()
        .oneshot(request)
        .await
        .expect("request should not fail")
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Register a fresh user and return `(token, user_id)`.
pub async fn register_user(app: &Router, email: &str) -> (String, String) {
    let response = post_json(
        app,
        "/api/v1/auth/register",
        None,
        serde_json::json!({ "email": email, "password": "Sup3r-secret!" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "registration failed");

    let json = body_json(response).await;
    let token = json["token"].as_str().expect("token in response").to_string();
    let user_id = json["user"]["id"]
        .as_str()
        .expect("user id in response")
        .to_string();
    (token, user_id)
}
