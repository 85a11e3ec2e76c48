//! Bidirectional index subsystem
//!
//! # Design Principles
//!
//! - Forward index: value -> document ids, ordered by value
//! - Reverse index: document id -> value, the source of truth
//! - Singleton entries stored as bare ids, promoted to sets on demand
//! - Deterministic: BTreeMap iteration order, ascending ids
//!
//! # Invariants
//!
//! - Forward and reverse agree after every public operation
//! - Cardinality counts distinct values, not documents
//! - Forward entries are never empty
//!
//! Durability, locking, and commit atomicity belong to the owning store.

mod anomaly;
mod entry;
mod extract;
mod forward;
mod index_core;
mod key;
mod reverse;
mod set_map;

pub use self::anomaly::{
    AnomalyKind, AnomalyObserver, ConsistencyAnomaly, LoggingObserver, RecordingObserver,
};
pub use self::entry::{DocumentId, EntryRemoval, ForwardEntry};
pub use self::extract::{JsonAttributeExtractor, ValueExtractor};
pub use self::forward::ForwardIndex;
pub use self::index_core::{ChangeStatus, FieldIndex, IndexCore, RemoveStatus, UniqueValues};
pub use self::key::IndexKey;
pub use self::reverse::ReverseIndex;
pub use self::set_map::{InsertOutcome, OrderedSetMap, RemoveOutcome};
