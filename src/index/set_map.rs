//! Ordered map from a sortable key to a set of document ids
//!
//! Backed by `BTreeMap` so iteration and range scans are ascending and
//! deterministic. Entries never exist empty.

use std::collections::BTreeMap;
use std::ops::Bound;

use super::entry::{DocumentId, EntryRemoval, ForwardEntry};

/// Outcome of inserting a document under a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new entry was created for the key
    Created,
    /// The document joined an existing entry
    Extended,
    /// The document was already under the key
    AlreadyPresent,
}

/// Outcome of removing a document from a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Removed; the entry still holds other documents
    Removed,
    /// Removed; the entry became empty and was deleted
    EntryDropped,
    /// No entry exists for the key
    MissingEntry,
    /// The entry exists but does not hold the document
    MissingDocument,
}

#[derive(Debug, Clone)]
pub struct OrderedSetMap<K> {
    map: BTreeMap<K, ForwardEntry>,
}

impl<K: Ord> Default for OrderedSetMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> OrderedSetMap<K> {
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&ForwardEntry> {
        self.map.get(key)
    }

    /// Add a document under a key, creating a scalar entry if absent.
    pub fn insert(&mut self, key: K, doc_id: DocumentId) -> InsertOutcome {
        match self.map.get_mut(&key) {
            Some(entry) => {
                if entry.insert(doc_id) {
                    InsertOutcome::Extended
                } else {
                    InsertOutcome::AlreadyPresent
                }
            }
            None => {
                self.map.insert(key, ForwardEntry::new(doc_id));
                InsertOutcome::Created
            }
        }
    }

    /// Remove a document from a key's entry.
    ///
    /// If the entry has no more documents, removes the key entirely.
    pub fn remove_doc(&mut self, key: &K, doc_id: DocumentId) -> RemoveOutcome {
        let Some(entry) = self.map.get_mut(key) else {
            return RemoveOutcome::MissingEntry;
        };

        match entry.remove(doc_id) {
            EntryRemoval::Removed => RemoveOutcome::Removed,
            EntryRemoval::Absent => RemoveOutcome::MissingDocument,
            EntryRemoval::Emptied => {
                self.map.remove(key);
                RemoveOutcome::EntryDropped
            }
        }
    }

    /// Entries with keys in `[lo, hi]`, ascending. A `None` bound is open.
    pub fn range(
        &self,
        lo: Option<&K>,
        hi: Option<&K>,
    ) -> Box<dyn Iterator<Item = (&K, &ForwardEntry)> + '_> {
        // BTreeMap::range panics on inverted bounds
        if let (Some(l), Some(h)) = (lo, hi) {
            if l > h {
                return Box::new(std::iter::empty());
            }
        }

        let bounds = (
            lo.map_or(Bound::Unbounded, Bound::Included),
            hi.map_or(Bound::Unbounded, Bound::Included),
        );
        Box::new(self.map.range::<K, _>(bounds))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &ForwardEntry)> {
        self.map.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Total number of document ids across all entries
    pub fn doc_count(&self) -> usize {
        self.map.values().map(ForwardEntry::len).sum()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
