//! Index Invariant Tests
//!
//! Tests for forward/reverse consistency:
//! - Put/remove round-trips through queries
//! - Repeated puts are idempotent
//! - Singleton entries promote and collapse correctly
//! - Cardinality counts distinct values
//! - Histogram sums match cardinality and document count

use bidex::observability::Logger;
use bidex::{ChangeStatus, IndexConfig, IndexCore, QueryRecord, RemoveStatus};

// =============================================================================
// Helper Functions
// =============================================================================

fn index<K: Ord + Clone + std::fmt::Debug>(id: &str) -> IndexCore<K> {
    IndexCore::with_logger(IndexConfig::new(id), Logger::discard())
}

fn hits<K: Ord + Clone + std::fmt::Debug>(index: &IndexCore<K>, value: K) -> Vec<u64> {
    index
        .query(&QueryRecord::exact([value]))
        .unwrap()
        .documents()
        .into_iter()
        .collect()
}

fn assert_histogram_sums<K: Ord + Clone + std::fmt::Debug>(index: &IndexCore<K>) {
    let histogram = index.histogram();
    let values: usize = histogram.values().sum();
    let documents: usize = histogram.iter().map(|(size, count)| size * count).sum();
    assert_eq!(values, index.cardinality());
    assert_eq!(documents, index.document_count());
}

// =============================================================================
// Round-trip Tests
// =============================================================================

/// A put document is found by its value; after remove it is not.
#[test]
fn test_put_query_remove_roundtrip() {
    let mut idx = index::<String>("name");

    idx.put(7, "alice".to_string());
    assert_eq!(hits(&idx, "alice".to_string()), vec![7]);

    assert_eq!(idx.remove(7), RemoveStatus::Removed);
    assert!(hits(&idx, "alice".to_string()).is_empty());
    assert!(idx.is_consistent());
}

/// Re-putting the same value reports unchanged and alters nothing.
#[test]
fn test_put_is_idempotent() {
    let mut idx = index::<i64>("age");

    assert_eq!(idx.put(1, 30), ChangeStatus::Changed);
    let before = idx.items();

    assert_eq!(idx.put(1, 30), ChangeStatus::Unchanged);
    assert_eq!(idx.items(), before);
    assert_eq!(idx.cardinality(), 1);
}

/// Removing twice: the second remove is a non-fatal not-found.
#[test]
fn test_double_remove_not_found() {
    let mut idx = index::<i64>("age");
    idx.put(1, 30);

    assert_eq!(idx.remove(1), RemoveStatus::Removed);
    assert_eq!(idx.remove(1), RemoveStatus::NotFound);
    assert!(idx.is_consistent());
}

// =============================================================================
// Scalar / Set Transition Tests
// =============================================================================

/// Two documents share a value; removing them one by one.
#[test]
fn test_shared_value_transitions() {
    let mut idx = index::<&str>("color");

    idx.put(1, "red");
    idx.put(2, "red");
    assert_eq!(hits(&idx, "red"), vec![1, 2]);
    assert_eq!(idx.forward().get(&"red").map(|e| e.len()), Some(2));

    idx.remove(1);
    assert_eq!(hits(&idx, "red"), vec![2]);

    idx.remove(2);
    assert!(idx.forward().get(&"red").is_none());
    assert_eq!(idx.cardinality(), 0);
}

/// Moving a document off a shared value leaves the other behind.
#[test]
fn test_reindex_off_shared_value() {
    let mut idx = index::<&str>("color");
    idx.put(1, "red");
    idx.put(2, "red");

    idx.put(1, "blue");

    assert_eq!(hits(&idx, "red"), vec![2]);
    assert_eq!(hits(&idx, "blue"), vec![1]);
    assert_eq!(idx.cardinality(), 2);
    assert!(idx.is_consistent());
}

// =============================================================================
// Cardinality / Histogram Tests
// =============================================================================

/// Cardinality tracks distinct values through a mixed workload.
#[test]
fn test_cardinality_tracks_distinct_values() {
    let mut idx = index::<i64>("bucket");

    for doc in 0..100u64 {
        idx.put(doc, (doc % 7) as i64);
    }
    assert_eq!(idx.cardinality(), 7);
    assert_eq!(idx.document_count(), 100);
    assert_histogram_sums(&idx);

    // Move every document of bucket 3 elsewhere.
    for doc in (3..100u64).step_by(7) {
        idx.put(doc, 100);
    }
    assert_eq!(idx.cardinality(), 7);
    assert!(idx.forward().get(&3).is_none());
    assert_histogram_sums(&idx);

    for doc in 0..50u64 {
        idx.remove(doc);
    }
    assert_eq!(idx.cardinality(), idx.forward().value_count());
    assert_eq!(idx.document_count(), 50);
    assert_histogram_sums(&idx);
    assert!(idx.is_consistent());
}

/// Missing datum unindexes without touching other documents.
#[test]
fn test_sentinel_unindexes_single_document() {
    let mut idx = index::<i64>("size");
    idx.put(1, 5);
    idx.put(2, 5);

    assert_eq!(idx.put_datum(1, None), ChangeStatus::Changed);

    assert_eq!(idx.entry_for_document(1), None);
    assert_eq!(hits(&idx, 5), vec![2]);
    assert_histogram_sums(&idx);
}

/// Clear empties everything and the index is reusable.
#[test]
fn test_clear_then_reuse() {
    let mut idx = index::<i64>("size");
    for doc in 0..10u64 {
        idx.put(doc, doc as i64);
    }

    idx.clear();
    assert!(idx.is_empty());
    assert_eq!(idx.cardinality(), 0);
    assert_eq!(idx.referenced_documents().count(), 0);

    idx.put(1, 1);
    assert_eq!(idx.cardinality(), 1);
    assert!(idx.is_consistent());
}

/// Reverse map iteration is ascending by document id.
#[test]
fn test_reverse_map_ascending() {
    let mut idx = index::<&str>("color");
    idx.put(30, "a");
    idx.put(10, "b");
    idx.put(20, "a");

    let docs: Vec<_> = idx.referenced_documents().collect();
    assert_eq!(docs, vec![10, 20, 30]);

    let pairs: Vec<_> = idx.document_to_key_map().iter().collect();
    assert_eq!(pairs, vec![(10, &"b"), (20, &"a"), (30, &"a")]);
}
