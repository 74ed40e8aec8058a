//! Admin API Error Types
//!
//! `AdminError` classifies what went wrong; `ApiError` pairs it with the
//! request's correlation id so the error body carries `cid` like every other
//! JSON response. Configuration and internal details stay in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::admin::auth::AuthError;
use crate::common::{respond, CorrelationId};
use crate::crypto::SigningError;

/// Result type for admin API operations
pub type AdminResult<T> = Result<T, ApiError>;

/// Admin API error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    /// Request input failed validation
    #[error("Validation error on {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Credential did not match
    #[error("Invalid password")]
    InvalidCredential,

    /// No valid admin session
    #[error("Unauthorized")]
    Unauthorized,

    /// Request signature missing or wrong
    #[error("Invalid signature")]
    InvalidSignature,

    /// A required setting is missing; names the setting
    #[error("Configuration error: {0} is not configured")]
    Configuration(&'static str),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,

    /// Error message
    pub message: String,

    /// Offending input field, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AdminError {
    /// Shorthand for a validation error
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidCredential | Self::Unauthorized | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::InvalidCredential => "Invalid password".to_string(),
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::InvalidSignature => "Invalid signature".to_string(),
            Self::Configuration(_) => "Server configuration error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Attach the correlation id of the failing request
    pub fn with_cid(self, cid: &CorrelationId) -> ApiError {
        ApiError {
            cid: cid.clone(),
            error: self,
        }
    }
}

impl From<AuthError> for AdminError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MissingCredential => Self::validation("password", "password is required"),
            AuthError::NotConfigured(setting) => Self::Configuration(setting),
            AuthError::InvalidCredential => Self::InvalidCredential,
            AuthError::Issue => Self::Internal(error.to_string()),
        }
    }
}

impl From<SigningError> for AdminError {
    fn from(error: SigningError) -> Self {
        match error {
            SigningError::MissingSecret => Self::Configuration("hmac_secret"),
            SigningError::Serialize(e) => Self::Internal(e),
        }
    }
}

/// An `AdminError` bound to a correlation id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub cid: CorrelationId,
    pub error: AdminError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let field = match &self.error {
            AdminError::Validation { field, .. } => Some(field.to_string()),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            message: self.error.public_message(),
            field,
        };

        respond(&self.cid, self.error.status(), body)
    }
}
