//! Forward index: value -> document ids

use std::collections::BTreeSet;

use super::entry::{DocumentId, ForwardEntry};
use super::set_map::{InsertOutcome, OrderedSetMap, RemoveOutcome};

/// Per-value home of document ids.
#[derive(Debug, Clone)]
pub struct ForwardIndex<K> {
    entries: OrderedSetMap<K>,
}

impl<K: Ord> Default for ForwardIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> ForwardIndex<K> {
    pub fn new() -> Self {
        Self {
            entries: OrderedSetMap::new(),
        }
    }

    pub fn get(&self, value: &K) -> Option<&ForwardEntry> {
        self.entries.get(value)
    }

    /// Document ids for a value; empty if the value is not indexed.
    pub fn documents(&self, value: &K) -> BTreeSet<DocumentId> {
        self.entries
            .get(value)
            .map(ForwardEntry::to_set)
            .unwrap_or_default()
    }

    pub fn insert(&mut self, value: K, doc_id: DocumentId) -> InsertOutcome {
        self.entries.insert(value, doc_id)
    }

    pub fn remove_doc(&mut self, value: &K, doc_id: DocumentId) -> RemoveOutcome {
        self.entries.remove_doc(value, doc_id)
    }

    pub fn range(
        &self,
        lo: Option<&K>,
        hi: Option<&K>,
    ) -> Box<dyn Iterator<Item = (&K, &ForwardEntry)> + '_> {
        self.entries.range(lo, hi)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &ForwardEntry)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Number of distinct values
    pub fn value_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of (value, document) pairs
    pub fn posting_count(&self) -> usize {
        self.entries.doc_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
