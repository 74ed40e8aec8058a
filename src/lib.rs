//! Backoffice Gate: admin sessions, request signing and correlated logging
//!
//! This library implements the authentication and request-integrity layer of
//! the marketing site's back-office.
//!
//! # Main Features
//!
//! - Admin password to signed session token exchange (Argon2id, HMAC-SHA256)
//! - A gate in front of every `/api/admin` route
//! - HMAC signing and verification of payloads exchanged with external systems
//! - Correlation ids on every response and log line
//! - Structured JSON logging with PII redaction and guarded execution
//!
//! # Example
//!
//! ```no_run
//! use backoffice_gate::admin::{serve, AppState};
//! use backoffice_gate::common::StructuredLogger;
//! use backoffice_gate::config::{ConfigLoader, ConfigValidator, GateConfig};
//! use backoffice_gate::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load config.json (if present) and BACKOFFICE_GATE_* variables
//!     let config = GateConfig::load(None)?;
//!     config.validate()?;
//!
//!     let listener = tokio::net::TcpListener::bind(config.listen).await?;
//!     let state = AppState::new(config, StructuredLogger::stdio());
//!
//!     serve(listener, state, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```

// Public modules
pub mod admin;
pub mod common;
pub mod config;
pub mod crypto;

// Re-export commonly used structures and functions for convenience
pub use admin::{build_router, start_server, AppState, Authenticator};
pub use common::{GateError, Result};
pub use crypto::HmacSigner;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
