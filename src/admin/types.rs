//! Request and response bodies
//!
//! Field names follow the JSON the site front-end already speaks (camelCase).
//! Responses get their `cid` field from [`crate::common::respond`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// Generic success acknowledgement
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// User attached to a verified session
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub role: String,
}

/// Session verification result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_authenticated: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Verified session details
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub role: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Inbound callback from an external system
#[derive(Debug, Deserialize)]
pub struct InboundEvent {
    /// Event name, e.g. `contact.created`
    pub event: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

/// Callback acknowledgement
#[derive(Debug, Serialize)]
pub struct HookAck {
    pub accepted: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}
