//! Test utilities for backend-lib integration tests
//!
//! Every test gets its own temporary data directory, so tests can run in
//! parallel without sharing users, posts or sessions.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::COOKIE, header::SET_COOKIE, HeaderMap, Method, Request, StatusCode},
    Router,
};
use backend_lib::{config::Settings, router, storage::FlatFileStorage, AppState};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Settings pointing at `temp_dir`, with a cheap scrypt cost
pub fn test_settings(temp_dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.data_dir = temp_dir.path().to_path_buf();
    settings.password.hash_log_n = 4;
    settings
}

/// Sets up a test environment with a temporary directory
///
/// # Returns
///
/// A tuple with:
/// - AppState with FlatFileStorage
/// - The temporary directory (keep this in scope to prevent cleanup during the test)
pub fn setup_test_env() -> (Arc<AppState<FlatFileStorage>>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = FlatFileStorage::new(temp_dir.path()).unwrap();
    let settings = test_settings(&temp_dir);

    let state = Arc::new(
        AppState::new(storage, &settings).expect("Failed to create AppState for test"),
    );

    (state, temp_dir)
}

/// The full HTTP router over a fresh test environment
pub fn setup_test_app() -> (Router, Arc<AppState<FlatFileStorage>>, TempDir) {
    let (state, temp_dir) = setup_test_env();
    (router::create_router(state.clone()), state, temp_dir)
}

/// Response of [`send`]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` of the cookie set by this response
    pub fn session_cookie(&self) -> String {
        let set_cookie = self
            .headers
            .get(SET_COOKIE)
            .expect("response sets a cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }
}

/// Send one request through the router
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Register `email` and return the session cookie pair
pub async fn register(app: &Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/users/register",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.session_cookie()
}
