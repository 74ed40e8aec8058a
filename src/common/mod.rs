//! Common module
//!
//! This module contains shared types, errors, and request-scoped utilities used
//! throughout the application: correlation ids, structured logging, redaction
//! and guarded execution.

pub mod correlation;
pub mod error;
pub mod guard;
pub mod log;
pub mod redact;

// Re-export commonly used types and functions
pub use correlation::{begin, correlation_middleware, respond, CorrelationId, CORRELATION_HEADER};
pub use error::{GateError, Result};
pub use guard::{run_guarded, Guarded};
pub use self::log::{init_logger, LogEvent, LogLevel, LogSink, MemorySink, StdioSink, StructuredLogger};
pub use redact::{redact, redact_opt};
