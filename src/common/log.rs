//! Logging utilities
//!
//! Two layers live here. `init_logger` wires the `log` facade to `env_logger`
//! for process diagnostics. `StructuredLogger` emits one JSON record per
//! request-scoped event to a [`LogSink`]; the default sink writes info and warn
//! records to stdout and error records to stderr.
//!
//! The structured logger never inspects field values. Callers pass
//! personally identifiable values through [`crate::common::redact`] first.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the record envelope; context fields with these names are dropped.
const RESERVED_KEYS: [&str; 3] = ["level", "timestamp", "message"];

/// Initialize the diagnostic logger
///
/// # Parameters
///
/// * `level` - Default filter, overridden by `RUST_LOG`
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default()
        .filter_or("RUST_LOG", level);

    // A second initialisation (tests, embedding) is harmless.
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Severity of a structured event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single structured log record
///
/// Context fields are flattened next to the envelope fields when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Event severity
    pub level: LogLevel,

    /// RFC 3339 timestamp in UTC
    pub timestamp: String,

    /// Human-readable message
    pub message: String,

    /// Auxiliary fields (correlation id, redacted PII, error text)
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

impl LogEvent {
    /// Build an event stamped with the current time
    ///
    /// An object `context` is merged field by field; any other JSON value is
    /// kept under a `context` key. `null` means no context.
    pub fn new(level: LogLevel, message: impl Into<String>, context: Value) -> Self {
        let mut fields = match context {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("context".to_string(), other);
                map
            }
        };
        fields.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));

        Self {
            level,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            message: message.into(),
            context: fields,
        }
    }

    /// Look up a context field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }
}

/// Destination for structured records
pub trait LogSink: Send + Sync {
    /// Write one record
    fn write(&self, event: &LogEvent);
}

type Writer = Mutex<Box<dyn Write + Send>>;

/// Writes JSON lines to an output stream (info, warn) or an error stream (error)
///
/// The default instance writes to stdout and stderr.
pub struct StdioSink {
    out: Writer,
    err: Writer,
}

impl StdioSink {
    /// Create a sink over explicit output and error streams
    pub fn new(out: impl Write + Send + 'static, err: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            err: Mutex::new(Box::new(err)),
        }
    }
}

impl Default for StdioSink {
    fn default() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl fmt::Debug for StdioSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdioSink").finish_non_exhaustive()
    }
}

impl LogSink for StdioSink {
    fn write(&self, event: &LogEvent) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to serialize log event: {}", e);
                return;
            }
        };

        let stream = match event.level {
            LogLevel::Error => &self.err,
            LogLevel::Info | LogLevel::Warn => &self.out,
        };
        // A poisoned lock only means another writer panicked mid-line
        let mut writer = match stream.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Logging must never take the request down with it.
        let _ = writeln!(writer, "{}", line).and_then(|()| writer.flush());
    }
}

/// Collects records in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record written so far
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Snapshot of error-level records
    pub fn errors(&self) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.level == LogLevel::Error)
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write(&self, event: &LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Lifecycle events of an external integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationEvent {
    Start,
    Success,
    Warn,
    Error,
}

impl IntegrationEvent {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Success => "success",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    fn level(self) -> LogLevel {
        match self {
            Self::Start | Self::Success => LogLevel::Info,
            Self::Warn => LogLevel::Warn,
            Self::Error => LogLevel::Error,
        }
    }
}

/// Structured event logger
///
/// Cheap to clone; all clones share the same sink.
#[derive(Clone)]
pub struct StructuredLogger {
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for StructuredLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredLogger").finish_non_exhaustive()
    }
}

impl Default for StructuredLogger {
    fn default() -> Self {
        Self::stdio()
    }
}

impl StructuredLogger {
    /// Create a logger writing to the given sink
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Create a logger writing to stdout/stderr
    pub fn stdio() -> Self {
        Self::new(Arc::new(StdioSink::default()))
    }

    /// Emit one record
    pub fn log(&self, level: LogLevel, message: impl Into<String>, context: Value) {
        let event = LogEvent::new(level, message, context);
        self.sink.write(&event);
    }

    pub fn info(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Info, message, context);
    }

    pub fn warn(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Warn, message, context);
    }

    pub fn error(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Error, message, context);
    }

    /// Logger for one external integration's lifecycle events
    pub fn integration(&self, namespace: &'static str) -> IntegrationLogger<'_> {
        IntegrationLogger {
            logger: self,
            namespace,
        }
    }
}

/// Integration-scoped logger
///
/// Messages are prefixed with `[<namespace>:<event>]` so they stand out when
/// grepping the stream.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationLogger<'a> {
    logger: &'a StructuredLogger,
    namespace: &'static str,
}

impl IntegrationLogger<'_> {
    pub fn start(&self, message: &str, context: Value) {
        self.emit(IntegrationEvent::Start, message, context);
    }

    pub fn success(&self, message: &str, context: Value) {
        self.emit(IntegrationEvent::Success, message, context);
    }

    pub fn warn(&self, message: &str, context: Value) {
        self.emit(IntegrationEvent::Warn, message, context);
    }

    pub fn error(&self, message: &str, context: Value) {
        self.emit(IntegrationEvent::Error, message, context);
    }

    fn emit(&self, event: IntegrationEvent, message: &str, context: Value) {
        let prefixed = format!("[{}:{}] {}", self.namespace, event.as_str(), message);
        self.logger.log(event.level(), prefixed, context);
    }
}
