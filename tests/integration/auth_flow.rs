//! Login, verify, logout and the admin gate

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use backoffice_gate::admin::token::{self, SessionClaims};
use backoffice_gate::common::CORRELATION_HEADER;
use backoffice_gate::config::{Environment, GateConfig};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use super::*;

fn with_cookie(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("admin_session={}", token))
        .body(Body::empty())
        .unwrap()
}

fn with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_login_success_sets_session_cookie() {
    let app = app();
    let (status, headers, body) = send(&app.router, login_request(PASSWORD)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["cid"].is_string());

    let cookie = set_cookie(&headers).unwrap();
    assert!(cookie.starts_with("admin_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn test_development_cookie_is_not_secure() {
    let config = GateConfig {
        environment: Environment::Development,
        ..full_config()
    };
    let app = app_with(config);
    let (status, headers, _) = send(&app.router, login_request(PASSWORD)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!set_cookie(&headers).unwrap().contains("Secure"));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = app();
    let (status, headers, body) = send(&app.router, login_request("not-the-password")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid password");
    assert!(body["cid"].is_string());
    assert!(set_cookie(&headers).is_none());
}

#[tokio::test]
async fn test_login_validation_errors() {
    let app = app();

    let cases = [
        json_request(Method::POST, "/api/auth/login", "{}"),
        json_request(Method::POST, "/api/auth/login", r#"{"password":""}"#),
        json_request(Method::POST, "/api/auth/login", "{not json"),
    ];

    for request in cases {
        let (status, headers, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["field"], "password");
        assert!(body["cid"].is_string());
        assert!(set_cookie(&headers).is_none());
    }
}

#[tokio::test]
async fn test_login_without_hash_is_configuration_error() {
    let config = GateConfig {
        admin_password_hash: None,
        ..full_config()
    };
    let app = app_with(config);
    let (status, _, body) = send(&app.router, login_request(PASSWORD)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_ne!(body["message"], "Invalid password");
    assert!(!body.to_string().contains("admin_password_hash"));
}

#[tokio::test]
async fn test_login_without_session_secret_is_configuration_error() {
    let config = GateConfig {
        session_secret: None,
        ..full_config()
    };
    let app = app_with(config);
    let (status, _, _) = send(&app.router, login_request(PASSWORD)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_verify_without_token() {
    let app = app();
    let (status, _, body) = send(&app.router, get("/api/auth/verify")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAuthenticated"], false);
    assert_eq!(body["message"], "No token");
    assert!(body.get("user").is_none());
}

#[tokio::test]
async fn test_token_verifies_immediately_after_login() {
    let app = app();
    let token = login(&app.router).await;

    let (status, _, body) = send(&app.router, with_cookie("/api/auth/verify", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAuthenticated"], true);
    assert_eq!(body["user"], json!({ "role": "admin" }));

    let (_, _, body) = send(&app.router, with_bearer("/api/auth/verify", &token)).await;
    assert_eq!(body["isAuthenticated"], true);
}

#[tokio::test]
async fn test_tampered_and_expired_tokens_are_invalid() {
    let app = app();
    let token = login(&app.router).await;

    // Re-sign nothing: swap in a payload claiming a later expiry
    let (_, signature) = token.split_once('.').unwrap();
    let now = Utc::now();
    let forged_claims = SessionClaims::admin(now, Duration::days(365));
    let forged = token::encode(&forged_claims, b"attacker-secret").unwrap();
    let (forged_payload, _) = forged.split_once('.').unwrap();
    let tampered = format!("{}.{}", forged_payload, signature);

    let expired_claims = SessionClaims {
        role: "admin".to_string(),
        issued_at: (now - Duration::days(2)).timestamp(),
        expires_at: (now - Duration::days(1)).timestamp(),
    };
    let expired = token::encode(&expired_claims, SESSION_SECRET.as_bytes()).unwrap();

    for candidate in [tampered, expired, "garbage".to_string()] {
        let (status, _, body) = send(&app.router, with_cookie("/api/auth/verify", &candidate)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isAuthenticated"], false);
        assert_eq!(body["message"], "Invalid token");
    }
}

#[tokio::test]
async fn test_non_admin_role_is_rejected() {
    let app = app();
    let now = Utc::now();
    let claims = SessionClaims {
        role: "editor".to_string(),
        issued_at: now.timestamp(),
        expires_at: (now + Duration::hours(1)).timestamp(),
    };
    let token = token::encode(&claims, SESSION_SECRET.as_bytes()).unwrap();

    let (_, _, body) = send(&app.router, with_cookie("/api/auth/verify", &token)).await;
    assert_eq!(body["isAuthenticated"], false);
    assert_eq!(body["message"], "Invalid role");

    let (status, _, _) = send(&app.router, with_cookie("/api/admin/session", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_gate_rejects_without_session() {
    let app = app();
    let (status, _, body) = send(&app.router, get("/api/admin/session")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unauthorized");
    assert!(body["cid"].is_string());

    let warnings: Vec<_> = app
        .sink
        .events()
        .into_iter()
        .filter(|e| e.message == "admin gate rejected request")
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("reason"), Some(&json!("No token")));
}

#[tokio::test]
async fn test_gate_admits_valid_session() {
    let app = app();
    let token = login(&app.router).await;

    let (status, _, body) = send(&app.router, with_bearer("/api/admin/session", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert!(body["issuedAt"].is_string());
    assert!(body["expiresAt"].is_string());
    assert!(body["cid"].is_string());
}

#[tokio::test]
async fn test_gate_without_session_secret() {
    let config = GateConfig {
        session_secret: None,
        ..full_config()
    };
    let app = app_with(config);
    let (status, _, body) = send(&app.router, with_cookie("/api/admin/session", "abc.def")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_correlation_id_is_echoed() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header(CORRELATION_HEADER, "abc123")
        .body(Body::from(json!({ "password": "wrong" }).to_string()))
        .unwrap();

    let (status, headers, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["cid"], "abc123");
    assert_eq!(headers.get(CORRELATION_HEADER).unwrap(), "abc123");

    let events = app.sink.events();
    assert!(!events.is_empty());
    for event in events {
        assert_eq!(event.field("cid"), Some(&json!("abc123")), "{:?}", event);
    }
}

#[tokio::test]
async fn test_correlation_id_is_generated() {
    let app = app();
    let (_, headers, body) = send(&app.router, get("/api/auth/verify")).await;

    let cid = body["cid"].as_str().unwrap();
    assert!(Uuid::parse_str(cid).is_ok());
    assert_eq!(headers.get(CORRELATION_HEADER).unwrap().to_str().unwrap(), cid);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .body(Body::empty())
        .unwrap();

    let (status, headers, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let cookie = set_cookie(&headers).unwrap();
    assert!(cookie.starts_with("admin_session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, _, body) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    assert!(body["cid"].is_string());
}
