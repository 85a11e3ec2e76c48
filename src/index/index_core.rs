//! Index core: keeps the forward and reverse maps consistent
//!
//! # API
//!
//! - `put(doc_id, value)` / `put_datum(doc_id, Option<value>)` - Index or re-index a document
//! - `index_object(doc_id, doc, extractor)` - Extract a datum, then `put_datum`
//! - `remove(doc_id)` - Unindex a document
//! - `clear()` - Reset both maps and the distinct-value counter
//! - `query(record)` / `apply_request(json)` - Read-only lookups
//!
//! # Invariants
//!
//! After every public operation:
//! - every reverse entry `d -> v` has `d` in the forward entry for `v`
//! - every document in the forward entry for `v` maps back to `v`
//! - `cardinality()` equals the number of forward entries
//! - no forward entry is ever empty
//!
//! The reverse map is authoritative. Drift found during removal is
//! reported to the anomaly observer and otherwise ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::IndexConfig;
use crate::observability::{Event, IndexMetrics, Logger, MetricsSnapshot, Severity};
use crate::query::{QueryEngine, QueryError, QueryOutcome, QueryRecord, QueryResult};

use super::anomaly::{AnomalyKind, AnomalyObserver, ConsistencyAnomaly, LoggingObserver};
use super::entry::DocumentId;
use super::extract::ValueExtractor;
use super::forward::ForwardIndex;
use super::key::IndexKey;
use super::reverse::ReverseIndex;
use super::set_map::{InsertOutcome, RemoveOutcome};

/// Result of `put`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    /// The document already held this value
    Unchanged,
    /// The index was modified
    Changed,
}

/// Result of `remove`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveStatus {
    Removed,
    /// The document was not indexed; not an error
    NotFound,
}

/// Distinct values, optionally with the number of documents holding each
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueValues<K> {
    Values(Vec<K>),
    WithCounts(Vec<(K, usize)>),
}

impl<K> UniqueValues<K> {
    pub fn len(&self) -> usize {
        match self {
            UniqueValues::Values(v) => v.len(),
            UniqueValues::WithCounts(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single-valued bidirectional index
pub struct IndexCore<K> {
    config: IndexConfig,
    forward: ForwardIndex<K>,
    reverse: ReverseIndex<K>,
    /// Distinct values with a forward entry
    distinct_values: usize,
    observer: Arc<dyn AnomalyObserver>,
    logger: Logger,
    metrics: IndexMetrics,
}

/// Index over JSON-derived keys
pub type FieldIndex = IndexCore<IndexKey>;

impl<K> fmt::Debug for IndexCore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexCore")
            .field("id", &self.config.id)
            .field("cardinality", &self.distinct_values)
            .field("documents", &self.reverse.len())
            .finish()
    }
}

impl<K: Ord + Clone + fmt::Debug> IndexCore<K> {
    /// Create an index logging to stderr at INFO.
    pub fn new(config: IndexConfig) -> Self {
        Self::with_logger(config, Logger::default())
    }

    /// Create an index whose anomalies are logged through `logger`.
    pub fn with_logger(config: IndexConfig, logger: Logger) -> Self {
        let observer = Arc::new(LoggingObserver::new(logger.clone()));
        Self::with_parts(config, logger, observer)
    }

    pub fn with_parts(
        config: IndexConfig,
        logger: Logger,
        observer: Arc<dyn AnomalyObserver>,
    ) -> Self {
        let operator = config.default_operator.as_str();
        logger.info(
            Event::IndexCreated,
            &[("default_operator", operator), ("index", config.id.as_str())],
        );

        Self {
            config,
            forward: ForwardIndex::new(),
            reverse: ReverseIndex::new(),
            distinct_values: 0,
            observer,
            logger,
            metrics: IndexMetrics::new(),
        }
    }

    /// Replace the anomaly observer.
    pub fn set_observer(&mut self, observer: Arc<dyn AnomalyObserver>) {
        self.observer = observer;
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Attributes a datum is extracted from.
    pub fn source_names(&self) -> Vec<String> {
        self.config.source_names()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Index `doc_id` under `value`.
    pub fn put(&mut self, doc_id: DocumentId, value: K) -> ChangeStatus {
        self.put_datum(doc_id, Some(value))
    }

    /// Index `doc_id` under `datum`; `None` means "no indexable value"
    /// and unindexes the document if it was indexed.
    pub fn put_datum(&mut self, doc_id: DocumentId, datum: Option<K>) -> ChangeStatus {
        if self.reverse.get(doc_id) == datum.as_ref() {
            self.metrics.increment_puts_unchanged();
            return ChangeStatus::Unchanged;
        }

        let previous = self.reverse.remove(doc_id);
        if let Some(old) = &previous {
            self.unlink_forward(old, doc_id);
        }

        match datum {
            Some(value) => {
                if self.logger.enabled(Severity::Trace) {
                    self.log_document(Event::DocumentIndexed, doc_id, Some(&value));
                }
                if self.forward.insert(value.clone(), doc_id) == InsertOutcome::Created {
                    self.distinct_values += 1;
                }
                self.reverse.set(doc_id, value);
            }
            None => {
                if self.logger.enabled(Severity::Trace) {
                    self.log_document(Event::DocumentUnindexed, doc_id, previous.as_ref());
                }
            }
        }

        self.metrics.increment_puts_changed();
        ChangeStatus::Changed
    }

    /// Extract a datum from `document` and index it.
    ///
    /// Source attributes are tried in order; the first that yields a
    /// value is used. If none does, the document is unindexed.
    pub fn index_object<D, E>(
        &mut self,
        doc_id: DocumentId,
        document: &D,
        extractor: &E,
    ) -> ChangeStatus
    where
        D: ?Sized,
        E: ValueExtractor<D, K> + ?Sized,
    {
        let datum = self
            .config
            .source_names()
            .iter()
            .find_map(|attr| extractor.extract(document, attr));
        self.put_datum(doc_id, datum)
    }

    /// Remove `doc_id` from the index.
    pub fn remove(&mut self, doc_id: DocumentId) -> RemoveStatus {
        let Some(old) = self.reverse.remove(doc_id) else {
            self.metrics.increment_removes_not_found();
            return RemoveStatus::NotFound;
        };

        self.unlink_forward(&old, doc_id);

        if self.logger.enabled(Severity::Trace) {
            self.log_document(Event::DocumentUnindexed, doc_id, Some(&old));
        }
        self.metrics.increment_removes();
        RemoveStatus::Removed
    }

    pub fn unindex_object(&mut self, doc_id: DocumentId) -> RemoveStatus {
        self.remove(doc_id)
    }

    /// Empty both maps and reset the distinct-value counter.
    pub fn clear(&mut self) {
        let dropped = self.reverse.len().to_string();

        self.forward.clear();
        self.reverse.clear();
        self.distinct_values = 0;

        self.metrics.increment_clears();
        self.logger.info(
            Event::IndexCleared,
            &[("documents", dropped.as_str()), ("index", self.config.id.as_str())],
        );
    }

    fn unlink_forward(&mut self, value: &K, doc_id: DocumentId) {
        match self.forward.remove_doc(value, doc_id) {
            RemoveOutcome::Removed => {}
            RemoveOutcome::EntryDropped => {
                self.distinct_values = self.distinct_values.saturating_sub(1);
            }
            RemoveOutcome::MissingEntry => {
                self.report_anomaly(AnomalyKind::MissingForwardEntry, doc_id, value);
            }
            RemoveOutcome::MissingDocument => {
                self.report_anomaly(AnomalyKind::DocumentNotInEntry, doc_id, value);
            }
        }
    }

    fn report_anomaly(&self, kind: AnomalyKind, doc_id: DocumentId, value: &K) {
        self.metrics.increment_anomalies();
        let anomaly = ConsistencyAnomaly {
            kind,
            index_id: self.config.id.clone(),
            document_id: doc_id,
            value: format!("{:?}", value),
        };
        self.observer.on_anomaly(&anomaly);
    }

    fn log_document(&self, event: Event, doc_id: DocumentId, value: Option<&K>) {
        let doc = doc_id.to_string();
        let value = value.map(|v| format!("{:?}", v)).unwrap_or_default();
        self.logger.trace(
            event,
            &[
                ("document_id", doc.as_str()),
                ("index", self.config.id.as_str()),
                ("value", value.as_str()),
            ],
        );
    }

    // =========================================================================
    // Query
    // =========================================================================

    /// Resolve a query record against the forward index.
    pub fn query(&self, record: &QueryRecord<K>) -> QueryResult<QueryOutcome> {
        let engine = QueryEngine::new(&self.forward, &self.config.id, self.config.default_operator);
        match engine.resolve(record) {
            Ok(outcome) => {
                if let QueryOutcome::Hits(hits) = &outcome {
                    self.metrics.increment_queries_executed();
                    if self.logger.enabled(Severity::Trace) {
                        let count = hits.len().to_string();
                        self.logger.trace(
                            Event::QueryExecuted,
                            &[("hits", count.as_str()), ("index", self.config.id.as_str())],
                        );
                    }
                }
                Ok(outcome)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    fn reject(&self, err: QueryError) -> QueryError {
        self.metrics.increment_queries_rejected();
        let message = err.to_string();
        self.logger.warn(
            Event::QueryRejected,
            &[
                ("code", err.code()),
                ("index", self.config.id.as_str()),
                ("reason", message.as_str()),
            ],
        );
        err
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Number of distinct values indexed (not documents).
    pub fn cardinality(&self) -> usize {
        self.distinct_values
    }

    /// Number of documents indexed.
    pub fn document_count(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Entry size -> number of values whose entry has that size.
    pub fn histogram(&self) -> BTreeMap<usize, usize> {
        let mut histogram = BTreeMap::new();
        for (_, entry) in self.forward.iter() {
            *histogram.entry(entry.len()).or_insert(0) += 1;
        }
        histogram
    }

    pub fn unique_values(&self, with_counts: bool) -> UniqueValues<K> {
        if with_counts {
            UniqueValues::WithCounts(
                self.forward
                    .iter()
                    .map(|(k, entry)| (k.clone(), entry.len()))
                    .collect(),
            )
        } else {
            UniqueValues::Values(self.forward.values().cloned().collect())
        }
    }

    pub fn has_unique_values_for(&self, name: &str) -> bool {
        name == self.config.id
    }

    /// Unique values when `name` is this index's id; empty otherwise.
    pub fn unique_values_for(&self, name: &str, with_counts: bool) -> UniqueValues<K> {
        if self.has_unique_values_for(name) {
            self.unique_values(with_counts)
        } else if with_counts {
            UniqueValues::WithCounts(Vec::new())
        } else {
            UniqueValues::Values(Vec::new())
        }
    }

    /// The value currently recorded for a document.
    pub fn entry_for_document(&self, doc_id: DocumentId) -> Option<&K> {
        self.reverse.get(doc_id)
    }

    /// Indexed document ids, ascending.
    pub fn referenced_documents(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.reverse.documents()
    }

    pub fn document_to_key_map(&self) -> &ReverseIndex<K> {
        &self.reverse
    }

    pub fn forward(&self) -> &ForwardIndex<K> {
        &self.forward
    }

    /// Every value with its expanded document set, ascending by value.
    pub fn items(&self) -> Vec<(K, BTreeSet<DocumentId>)> {
        self.forward
            .iter()
            .map(|(k, entry)| (k.clone(), entry.to_set()))
            .collect()
    }

    /// Check both maps against each other.
    pub fn is_consistent(&self) -> bool {
        let reverse_ok = self.reverse.iter().all(|(doc_id, value)| {
            self.forward
                .get(value)
                .is_some_and(|entry| entry.contains(doc_id))
        });
        let forward_ok = self.forward.iter().all(|(value, entry)| {
            !entry.is_empty() && entry.iter().all(|d| self.reverse.get(d) == Some(value))
        });

        reverse_ok && forward_ok && self.distinct_values == self.forward.value_count()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl IndexCore<IndexKey> {
    /// Parse this index's part of a JSON request and resolve it.
    pub fn apply_request(&self, request: &Value) -> QueryResult<QueryOutcome> {
        match QueryRecord::from_request(request, &self.config.id) {
            Ok(Some(record)) => self.query(&record),
            Ok(None) => Ok(QueryOutcome::NotAddressed),
            Err(err) => Err(self.reject(err)),
        }
    }
}
