//! Signed inbound callbacks

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use backoffice_gate::common::{LogLevel, CORRELATION_HEADER};
use backoffice_gate::config::GateConfig;
use backoffice_gate::crypto::{sign, HmacSigner, SIGNATURE_HEADER};
use secrecy::SecretString;
use serde_json::json;

use super::*;

fn hook_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/hooks/inbound")
        .header(header::CONTENT_TYPE, "application/json")
        .header(CORRELATION_HEADER, "hook-cid");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn signature_for(body: &str) -> String {
    sign(body.as_bytes(), HMAC_SECRET.as_bytes()).unwrap()
}

#[tokio::test]
async fn test_signed_callback_is_accepted() {
    let app = app();
    let body = r#"{"event":"contact.created","email":"ab@example.com","phone":"+491234567"}"#;

    let (status, _, response) = send(&app.router, hook_request(body, Some(&signature_for(body)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "accepted": true, "cid": "hook-cid" }));

    let events = app.sink.events();
    let success = events
        .iter()
        .find(|e| e.message.starts_with("[crm:success]"))
        .unwrap();
    assert_eq!(success.field("email"), Some(&json!("ab***@example.com")));
    assert_eq!(success.field("phone"), Some(&json!("+49***67")));
    assert!(app.sink.errors().is_empty());
}

#[tokio::test]
async fn test_outbound_signer_matches_inbound_check() {
    let app = app();
    let signer = HmacSigner::new(Some(SecretString::from(HMAC_SECRET.to_string())));
    let signed = signer.sign_json(&json!({ "event": "lead.updated" })).unwrap();
    let body = String::from_utf8(signed.body).unwrap();

    let (status, _, _) = send(&app.router, hook_request(&body, Some(&signed.signature))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_or_wrong_signature() {
    let app = app();
    let body = r#"{"event":"contact.created"}"#;

    let (status, _, response) = send(&app.router, hook_request(body, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["success"], false);
    assert_eq!(response["cid"], "hook-cid");

    let tampered = r#"{"event":"contact.deleted"}"#;
    let (status, _, _) = send(&app.router, hook_request(tampered, Some(&signature_for(body)))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_hmac_secret() {
    let config = GateConfig {
        hmac_secret: None,
        ..full_config()
    };
    let app = app_with(config);
    let body = r#"{"event":"contact.created"}"#;

    let (status, _, response) = send(&app.router, hook_request(body, Some(&signature_for(body)))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn test_undecodable_payload_logs_one_error() {
    let app = app();
    let body = r#"{"email":"ab@example.com"}"#;

    let (status, _, response) = send(&app.router, hook_request(body, Some(&signature_for(body)))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["accepted"], false);
    assert_eq!(response["cid"], "hook-cid");

    let errors = app.sink.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, LogLevel::Error);
    assert_eq!(errors[0].field("cid"), Some(&json!("hook-cid")));
    assert_eq!(errors[0].field("context"), Some(&json!("hooks.inbound")));
    assert!(!errors[0].field("error").unwrap().to_string().contains("ab@example.com"));
}
