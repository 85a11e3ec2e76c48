//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, `severity` second, then fields sorted by key
//! - Synchronous, no buffering
//! - No global state: every index owns its `Logger`

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-operation detail
    Trace = 0,
    /// Normal lifecycle
    Info = 1,
    /// Rejected input
    Warn = 2,
    /// Internal inconsistency, absorbed
    Error = 3,
    /// Unrecoverable
    Fatal = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogSink {
    Stdout,
    Stderr,
    /// Shared in-memory buffer, read back through [`LogBuffer`]
    Buffer(Arc<Mutex<Vec<u8>>>),
    /// Drop everything
    Discard,
}

/// Read handle for a buffered logger
#[derive(Debug, Clone)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    /// All lines written so far
    pub fn lines(&self) -> Vec<String> {
        let bytes = match self.0.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Parsed lines whose `event` matches
    pub fn events(&self, event: Event) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
            .filter(|v| v["event"] == event.as_str())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Logger {
    sink: LogSink,
    min_severity: Severity,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogSink::Stderr, Severity::Info)
    }
}

impl Logger {
    pub fn new(sink: LogSink, min_severity: Severity) -> Self {
        Self { sink, min_severity }
    }

    /// A logger that writes nothing
    pub fn discard() -> Self {
        Self::new(LogSink::Discard, Severity::Fatal)
    }

    /// A logger writing into memory, plus the handle to read it back
    pub fn buffered(min_severity: Severity) -> (Self, LogBuffer) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let logger = Self::new(LogSink::Buffer(Arc::clone(&buffer)), min_severity);
        (logger, LogBuffer(buffer))
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// Whether a line at this severity would be written
    pub fn enabled(&self, severity: Severity) -> bool {
        !matches!(self.sink, LogSink::Discard) && severity >= self.min_severity
    }

    pub fn log(&self, severity: Severity, event: Event, fields: &[(&str, &str)]) {
        if !self.enabled(severity) {
            return;
        }

        let line = render(severity, event.as_str(), fields);

        // Write atomically (one call); logging failures never reach the index.
        match &self.sink {
            LogSink::Stdout => {
                let mut out = io::stdout();
                let _ = out.write_all(line.as_bytes());
                let _ = out.flush();
            }
            LogSink::Stderr => {
                let mut out = io::stderr();
                let _ = out.write_all(line.as_bytes());
                let _ = out.flush();
            }
            LogSink::Buffer(buffer) => {
                let mut guard = match buffer.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                guard.extend_from_slice(line.as_bytes());
            }
            LogSink::Discard => {}
        }
    }

    pub fn trace(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Trace, event, fields);
    }

    pub fn info(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    pub fn warn(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    pub fn error(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Error, event, fields);
    }
}

/// Render one JSON line with deterministic key order
fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(128);

    output.push_str("{\"event\":\"");
    escape_json_string(&mut output, event);
    output.push_str("\",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push_str("}\n");
    output
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}
