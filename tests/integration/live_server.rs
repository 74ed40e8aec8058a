//! End-to-end test over a real socket

use std::sync::Arc;

use backoffice_gate::admin::{serve, AppState};
use backoffice_gate::common::{MemorySink, StructuredLogger};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::*;

#[tokio::test]
async fn test_login_and_verify_over_http() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let logger = StructuredLogger::new(Arc::new(MemorySink::new()));
    let state = AppState::new(full_config(), logger);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(serve(listener, state, async move {
        let _ = shutdown_rx.await;
    }));

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let response = client
        .post(format!("{}/api/auth/login", base))
        .header("x-correlation-id", "live-1")
        .json(&json!({ "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["x-correlation-id"], "live-1");

    let cookie = response.headers()["set-cookie"].to_str().unwrap().to_string();
    let session = cookie.split(';').next().unwrap().to_string();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["cid"], "live-1");

    let body: Value = client
        .get(format!("{}/api/auth/verify", base))
        .header("cookie", session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["isAuthenticated"], true);
    assert_eq!(body["user"]["role"], "admin");

    drop(client);
    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
