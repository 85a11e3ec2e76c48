//! Non-fatal diagnostics for forward/reverse drift
//!
//! The reverse index is authoritative. When removal finds the forward
//! side disagreeing, the anomaly is reported here and the operation
//! carries on as if the forward side were already consistent.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::observability::{Event, Logger};

use super::entry::DocumentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// No forward entry exists for the document's recorded value
    MissingForwardEntry,
    /// The forward entry exists but does not hold the document
    DocumentNotInEntry,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::MissingForwardEntry => "MISSING_FORWARD_ENTRY",
            AnomalyKind::DocumentNotInEntry => "DOCUMENT_NOT_IN_ENTRY",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyAnomaly {
    pub kind: AnomalyKind,
    /// Identifier of the index that observed the drift
    pub index_id: String,
    pub document_id: DocumentId,
    /// Rendered value the reverse index recorded for the document
    pub value: String,
}

impl fmt::Display for ConsistencyAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: index {} could not remove document {} from value {}",
            self.kind, self.index_id, self.document_id, self.value
        )
    }
}

/// Receives consistency anomalies as they are absorbed.
pub trait AnomalyObserver: Send + Sync {
    fn on_anomaly(&self, anomaly: &ConsistencyAnomaly);
}

/// Default observer: one ERROR log line per anomaly.
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    logger: Logger,
}

impl LoggingObserver {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl AnomalyObserver for LoggingObserver {
    fn on_anomaly(&self, anomaly: &ConsistencyAnomaly) {
        let doc_id = anomaly.document_id.to_string();
        self.logger.error(
            Event::ConsistencyAnomaly,
            &[
                ("document_id", doc_id.as_str()),
                ("index", anomaly.index_id.as_str()),
                ("kind", anomaly.kind.as_str()),
                ("value", anomaly.value.as_str()),
            ],
        );
    }
}

/// Collects anomalies for later inspection. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    seen: Arc<Mutex<Vec<ConsistencyAnomaly>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anomalies(&self) -> Vec<ConsistencyAnomaly> {
        match self.seen.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.anomalies().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnomalyObserver for RecordingObserver {
    fn on_anomaly(&self, anomaly: &ConsistencyAnomaly) {
        let mut guard = match self.seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(anomaly.clone());
    }
}
