//! Query resolution against a forward index
//!
//! Read-only: resolution never mutates the index.
//!
//! - Exact match: union (OR) or intersection (AND) of each value's
//!   document set; a value with no entry contributes the empty set.
//! - Range: ascending scan between the bounds, always combined by union
//!   whatever operator the record declares.

use std::collections::BTreeSet;

use crate::index::{DocumentId, ForwardIndex};

use super::errors::QueryResult;
use super::request::{Operator, QueryRecord};

/// Matching documents plus the fields that produced them
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryHits {
    /// Matching document ids, ascending
    pub documents: BTreeSet<DocumentId>,
    /// Field names considered
    pub fields: Vec<String>,
}

impl QueryHits {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, doc_id: DocumentId) -> bool {
        self.documents.contains(&doc_id)
    }
}

/// Result of resolving a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The record named no values and no range; the index was not queried
    NotAddressed,
    /// The index was queried; the hit set may be empty
    Hits(QueryHits),
}

impl QueryOutcome {
    pub fn hits(&self) -> Option<&QueryHits> {
        match self {
            QueryOutcome::NotAddressed => None,
            QueryOutcome::Hits(hits) => Some(hits),
        }
    }

    pub fn into_hits(self) -> Option<QueryHits> {
        match self {
            QueryOutcome::NotAddressed => None,
            QueryOutcome::Hits(hits) => Some(hits),
        }
    }

    pub fn is_addressed(&self) -> bool {
        matches!(self, QueryOutcome::Hits(_))
    }

    /// Matching ids, or an empty set when the index was not addressed
    pub fn documents(&self) -> BTreeSet<DocumentId> {
        self.hits().map(|h| h.documents.clone()).unwrap_or_default()
    }
}

pub struct QueryEngine<'a, K> {
    forward: &'a ForwardIndex<K>,
    index_id: &'a str,
    default_operator: Operator,
}

impl<'a, K: Ord> QueryEngine<'a, K> {
    pub fn new(forward: &'a ForwardIndex<K>, index_id: &'a str, default_operator: Operator) -> Self {
        Self {
            forward,
            index_id,
            default_operator,
        }
    }

    pub fn resolve(&self, record: &QueryRecord<K>) -> QueryResult<QueryOutcome> {
        if record.is_empty() {
            return Ok(QueryOutcome::NotAddressed);
        }

        let documents = match record.bounds()? {
            Some((lo, hi)) => self.scan_range(lo, hi),
            None => {
                let operator = record.operator.unwrap_or(self.default_operator);
                self.match_values(&record.values, operator)
            }
        };

        let fields = if record.fields.is_empty() {
            vec![self.index_id.to_string()]
        } else {
            record.fields.clone()
        };

        Ok(QueryOutcome::Hits(QueryHits { documents, fields }))
    }

    fn match_values(&self, values: &[K], operator: Operator) -> BTreeSet<DocumentId> {
        let mut sets = values.iter().map(|v| self.forward.documents(v));

        let Some(first) = sets.next() else {
            return BTreeSet::new();
        };

        match operator {
            Operator::Or => sets.fold(first, |mut acc, set| {
                acc.extend(set);
                acc
            }),
            Operator::And => sets.fold(first, |acc, set| {
                if acc.is_empty() {
                    acc
                } else {
                    acc.intersection(&set).copied().collect()
                }
            }),
        }
    }

    fn scan_range(&self, lo: Option<&K>, hi: Option<&K>) -> BTreeSet<DocumentId> {
        self.forward
            .range(lo, hi)
            .flat_map(|(_, entry)| entry.iter())
            .collect()
    }
}
