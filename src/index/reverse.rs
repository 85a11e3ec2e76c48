//! Reverse index: document id -> current value
//!
//! Authoritative answer to "what value does this document hold".

use std::collections::BTreeMap;

use super::entry::DocumentId;

#[derive(Debug, Clone)]
pub struct ReverseIndex<K> {
    values: BTreeMap<DocumentId, K>,
}

impl<K> Default for ReverseIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ReverseIndex<K> {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, doc_id: DocumentId) -> Option<&K> {
        self.values.get(&doc_id)
    }

    /// Set a document's value, returning the previous one.
    pub fn set(&mut self, doc_id: DocumentId, value: K) -> Option<K> {
        self.values.insert(doc_id, value)
    }

    pub fn remove(&mut self, doc_id: DocumentId) -> Option<K> {
        self.values.remove(&doc_id)
    }

    pub fn contains(&self, doc_id: DocumentId) -> bool {
        self.values.contains_key(&doc_id)
    }

    /// Indexed document ids, ascending.
    pub fn documents(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocumentId, &K)> {
        self.values.iter().map(|(id, v)| (*id, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
