//! Integration tests for the back-office gate HTTP API
//!
//! Router-level tests drive `build_router` with `oneshot`; one test runs the
//! server on a real socket.

#![allow(dead_code)]

mod auth_flow;
mod hooks;
mod live_server;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use backoffice_gate::admin::{build_router, AppState};
use backoffice_gate::common::{MemorySink, StructuredLogger};
use backoffice_gate::config::GateConfig;
use backoffice_gate::crypto::password::{fast_params, hash_password_with};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "letmein-please";
pub const SESSION_SECRET: &str = "integration-session-secret";
pub const HMAC_SECRET: &str = "integration-hmac-secret";

/// Router plus the sink its structured logger writes to
pub struct TestApp {
    pub router: Router,
    pub sink: MemorySink,
}

/// Configuration with every secret set
pub fn full_config() -> GateConfig {
    let hash = hash_password_with(PASSWORD, fast_params().unwrap()).unwrap();
    GateConfig {
        admin_password_hash: Some(SecretString::from(hash)),
        session_secret: Some(SecretString::from(SESSION_SECRET.to_string())),
        hmac_secret: Some(SecretString::from(HMAC_SECRET.to_string())),
        ..GateConfig::default()
    }
}

pub fn app_with(config: GateConfig) -> TestApp {
    let sink = MemorySink::new();
    let logger = StructuredLogger::new(Arc::new(sink.clone()));
    let router = build_router(AppState::new(config, logger));
    TestApp { router, sink }
}

pub fn app() -> TestApp {
    app_with(full_config())
}

pub fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn login_request(password: &str) -> Request<Body> {
    let body = serde_json::json!({ "password": password }).to_string();
    json_request(Method::POST, "/api/auth/login", &body)
}

/// Send one request; the body is parsed as JSON (`Null` when empty)
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

/// The `Set-Cookie` header as a string
pub fn set_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// The session token inside a `Set-Cookie` header
pub fn session_token(headers: &HeaderMap) -> String {
    let cookie = set_cookie(headers).unwrap();
    let pair = cookie.split(';').next().unwrap();
    pair.strip_prefix("admin_session=").unwrap().to_string()
}

/// Log in with the test password and return the issued token
pub async fn login(router: &Router) -> String {
    let (status, headers, _) = send(router, login_request(PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    session_token(&headers)
}
