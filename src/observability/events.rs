//! Observable index events

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Index constructed
    IndexCreated,
    /// Both maps and the counter reset
    IndexCleared,
    /// A document's value changed
    DocumentIndexed,
    /// A document left the index
    DocumentUnindexed,
    /// Forward and reverse maps disagreed during removal
    ConsistencyAnomaly,
    /// Query resolved
    QueryExecuted,
    /// Query failed validation
    QueryRejected,
    /// Configuration file read
    ConfigLoaded,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::IndexCreated => "INDEX_CREATED",
            Event::IndexCleared => "INDEX_CLEARED",
            Event::DocumentIndexed => "DOCUMENT_INDEXED",
            Event::DocumentUnindexed => "DOCUMENT_UNINDEXED",
            Event::ConsistencyAnomaly => "INDEX_CONSISTENCY_ANOMALY",
            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
