//! Guarded execution of fallible async operations
//!
//! `run_guarded` turns an error result or a panic into [`Guarded::Failed`]
//! after logging exactly one error event. Nothing is re-raised, so callers
//! branch on the returned variant.
//!
//! A panic still passes through the process panic hook before it is caught.
//! The default hook prints its own plain-text line to stderr, which may quote
//! the panic message. Only the structured record goes through the logger, so
//! panic messages should not carry payload data.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde_json::json;

use super::correlation::CorrelationId;
use super::log::StructuredLogger;

const UNKNOWN_ERROR: &str = "unknown error";

/// Outcome of a guarded operation
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    /// The operation returned a value
    Completed(T),
    /// The operation failed; the failure has already been logged
    Failed,
}

impl<T> Guarded<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Convert into an `Option`, discarding the failure marker
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Failed => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Guarded<U> {
        match self {
            Self::Completed(value) => Guarded::Completed(f(value)),
            Self::Failed => Guarded::Failed,
        }
    }
}

/// Run `operation`, logging and absorbing any failure
///
/// # Parameters
///
/// * `logger` - Sink for the failure event
/// * `cid` - Correlation id of the current request
/// * `context` - Name of the operation, recorded on failure
/// * `operation` - The future to drive
pub async fn run_guarded<T, E, F>(
    logger: &StructuredLogger,
    cid: &CorrelationId,
    context: &str,
    operation: F,
) -> Guarded<T>
where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    match AssertUnwindSafe(operation).catch_unwind().await {
        Ok(Ok(value)) => Guarded::Completed(value),
        Ok(Err(e)) => {
            report_failure(logger, cid, context, &e.to_string());
            Guarded::Failed
        }
        Err(panic) => {
            report_failure(logger, cid, context, &panic_message(panic.as_ref()));
            Guarded::Failed
        }
    }
}

fn report_failure(logger: &StructuredLogger, cid: &CorrelationId, context: &str, message: &str) {
    let error = if message.trim().is_empty() { UNKNOWN_ERROR } else { message };
    logger.error(
        format!("{} failed", context),
        json!({
            "cid": cid.as_str(),
            "context": context,
            "error": error,
        }),
    );
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::new()
    }
}
