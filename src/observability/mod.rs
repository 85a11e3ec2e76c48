//! Observability for the index
//!
//! - Structured logging (JSON lines), owned per index
//! - Monotonic counters
//! - Typed events
//!
//! Observability is read-only: a logging or metrics failure never changes
//! the outcome of an index operation.
//!
//! # Usage
//!
//! ```
//! use bidex::observability::{Event, Logger, Severity};
//!
//! let (logger, buffer) = Logger::buffered(Severity::Info);
//! logger.info(Event::IndexCleared, &[("index", "color")]);
//! assert_eq!(buffer.lines().len(), 1);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{LogBuffer, LogSink, Logger, Severity};
pub use metrics::{IndexMetrics, MetricsSnapshot};
