//! bidex - A single-valued, bidirectional inverted index
//!
//! Forward index (value -> document ids) and reverse index
//! (document id -> value) kept consistent under put/remove, with
//! OR/AND and range queries over the forward side.
//!
//! ```
//! use bidex::{FieldIndex, IndexConfig, IndexKey, QueryRecord};
//! use bidex::observability::Logger;
//!
//! let mut index = FieldIndex::with_logger(IndexConfig::new("color"), Logger::discard());
//! index.put(1, IndexKey::from_string("red"));
//! index.put(2, IndexKey::from_string("blue"));
//!
//! let outcome = index.query(&QueryRecord::exact([IndexKey::from_string("red")])).unwrap();
//! assert!(outcome.documents().contains(&1));
//! ```

pub mod config;
pub mod index;
pub mod observability;
pub mod query;

pub use config::{ConfigError, ConfigResult, IndexConfig};
pub use index::{
    AnomalyKind, AnomalyObserver, ChangeStatus, ConsistencyAnomaly, DocumentId, FieldIndex,
    ForwardEntry, ForwardIndex, IndexCore, IndexKey, JsonAttributeExtractor, LoggingObserver,
    OrderedSetMap, RecordingObserver, RemoveStatus, ReverseIndex, UniqueValues, ValueExtractor,
};
pub use query::{
    Operator, QueryEngine, QueryError, QueryHits, QueryOutcome, QueryRecord, QueryResult,
    RangeDirective,
};
