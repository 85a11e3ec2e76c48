//! Forward entries: the document ids sharing one value
//!
//! A value held by a single document is stored as a bare id; the second
//! document promotes it to an ordered set. Callers see the same
//! membership, iteration, and length either way.

use std::collections::BTreeSet;

/// Document identifier
pub type DocumentId = u64;

/// Result of removing a document from an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRemoval {
    /// The document was removed and the entry still holds others
    Removed,
    /// The document was the last one; the entry must be dropped
    Emptied,
    /// The document was not part of the entry
    Absent,
}

/// Document ids for one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardEntry {
    /// Exactly one document holds the value
    Scalar(DocumentId),
    /// Two or more documents hold the value
    Set(BTreeSet<DocumentId>),
}

impl ForwardEntry {
    pub fn new(doc_id: DocumentId) -> Self {
        ForwardEntry::Scalar(doc_id)
    }

    /// Add a document, promoting a scalar to a set when needed.
    ///
    /// Returns false if the document was already present.
    pub fn insert(&mut self, doc_id: DocumentId) -> bool {
        match self {
            ForwardEntry::Scalar(existing) if *existing == doc_id => false,
            ForwardEntry::Scalar(existing) => {
                let set: BTreeSet<_> = [*existing, doc_id].into_iter().collect();
                *self = ForwardEntry::Set(set);
                true
            }
            ForwardEntry::Set(set) => set.insert(doc_id),
        }
    }

    /// Remove a document. A set left with one member is demoted back
    /// to a scalar.
    pub fn remove(&mut self, doc_id: DocumentId) -> EntryRemoval {
        match self {
            ForwardEntry::Scalar(existing) if *existing == doc_id => EntryRemoval::Emptied,
            ForwardEntry::Scalar(_) => EntryRemoval::Absent,
            ForwardEntry::Set(set) => {
                if !set.remove(&doc_id) {
                    return EntryRemoval::Absent;
                }
                match set.len() {
                    0 => EntryRemoval::Emptied,
                    1 => {
                        if let Some(&last) = set.iter().next() {
                            *self = ForwardEntry::Scalar(last);
                        }
                        EntryRemoval::Removed
                    }
                    _ => EntryRemoval::Removed,
                }
            }
        }
    }

    pub fn contains(&self, doc_id: DocumentId) -> bool {
        match self {
            ForwardEntry::Scalar(existing) => *existing == doc_id,
            ForwardEntry::Set(set) => set.contains(&doc_id),
        }
    }

    /// Number of documents holding the value (1 for scalars).
    pub fn len(&self) -> usize {
        match self {
            ForwardEntry::Scalar(_) => 1,
            ForwardEntry::Set(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate document ids in ascending order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = DocumentId> + '_> {
        match self {
            ForwardEntry::Scalar(id) => Box::new(std::iter::once(*id)),
            ForwardEntry::Set(set) => Box::new(set.iter().copied()),
        }
    }

    pub fn to_set(&self) -> BTreeSet<DocumentId> {
        self.iter().collect()
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, ForwardEntry::Scalar(_))
    }
}
