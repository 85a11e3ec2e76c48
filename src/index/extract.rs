//! Value extraction strategies
//!
//! The owning collection decides how a datum is read from a document.
//! Extraction never fails: a document without a usable value yields
//! `None`, which the index treats as "not indexed".

use serde_json::Value;

use super::key::IndexKey;

pub trait ValueExtractor<D: ?Sized, K> {
    /// Read `attribute` from `document`, or `None` if it has no indexable value.
    fn extract(&self, document: &D, attribute: &str) -> Option<K>;
}

/// Top-level attribute lookup on JSON objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAttributeExtractor;

impl ValueExtractor<Value, IndexKey> for JsonAttributeExtractor {
    fn extract(&self, document: &Value, attribute: &str) -> Option<IndexKey> {
        document.get(attribute).and_then(IndexKey::from_json)
    }
}

impl<D: ?Sized, K, F> ValueExtractor<D, K> for F
where
    F: Fn(&D, &str) -> Option<K>,
{
    fn extract(&self, document: &D, attribute: &str) -> Option<K> {
        self(document, attribute)
    }
}
