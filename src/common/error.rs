//! Error handling module
//!
//! This module defines the crate-wide error type and result alias used by
//! configuration loading, server startup and the command-line tool.

use thiserror::Error;
use std::io;

/// Back-office gate error type
#[derive(Error, Debug)]
pub enum GateError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Password hashing error
    #[error("Password error: {0}")]
    Password(#[from] crate::crypto::PasswordError),

    /// HTTP server error
    #[error("Server error: {0}")]
    Server(String),

    /// Invalid command-line input
    #[error("Invalid input: {0}")]
    Input(String),
}

impl From<config::ConfigError> for GateError {
    fn from(err: config::ConfigError) -> Self {
        GateError::Config(err.to_string())
    }
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `GateError`.
pub type Result<T> = std::result::Result<T, GateError>;
