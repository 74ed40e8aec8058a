//! Default configuration values
//!
//! This module provides default values for configuration options.
//! It is designed to be a single source of truth for defaults,
//! making it easier to maintain consistent defaults across the application.

use std::net::{Ipv4Addr, SocketAddr};

use super::Environment;

/// Environment variable prefix for all configuration options
pub const ENV_PREFIX: &str = "BACKOFFICE_GATE";

/// Environment variable naming the configuration file
pub const CONFIG_FILE_ENV: &str = "BACKOFFICE_GATE_CONFIG_FILE";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Default listen port
pub const LISTEN_PORT: u16 = 8080;

/// Default log level as string
pub const LOG_LEVEL_STR: &str = "info";

/// Session lifetime: 24 hours
pub const SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Upper bound accepted for the session lifetime: 30 days
pub const MAX_SESSION_TTL_SECS: u64 = 30 * SESSION_TTL_SECS;

/// Default listen address
pub fn listen() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, LISTEN_PORT))
}

/// Default log level
pub fn log_level() -> String {
    LOG_LEVEL_STR.to_string()
}

/// Default deployment environment
pub fn environment() -> Environment {
    Environment::Production
}

/// Default session lifetime in seconds
pub fn session_ttl_secs() -> u64 {
    SESSION_TTL_SECS
}
