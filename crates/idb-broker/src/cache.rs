//! Attempt-scoped resolution cache.
//!
//! Both resolver invocations of one federation attempt share an
//! [`AttemptCache`] passed by reference, so the post-phase reuses the
//! pre-phase outcome without a second remote call. Entries are keyed by
//! attribute name and flow id and never outlive the attempt; the cache is
//! never shared across attempts, so no locking is involved.

use std::collections::HashMap;

use uuid::Uuid;

use crate::value::ResolvedValue;

/// Cache key: one attribute within one federation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Target attribute name.
    pub attribute: String,
    /// Flow id of the attempt.
    pub flow_id: Uuid,
}

impl CacheKey {
    /// Creates a cache key.
    #[must_use]
    pub fn new(attribute: impl Into<String>, flow_id: Uuid) -> Self {
        Self {
            attribute: attribute.into(),
            flow_id,
        }
    }
}

/// Per-attempt cache of resolved values.
#[derive(Debug, Clone, Default)]
pub struct AttemptCache {
    entries: HashMap<CacheKey, ResolvedValue>,
}

impl AttemptCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cached value for an attribute within a flow.
    #[must_use]
    pub fn get(&self, attribute: &str, flow_id: Uuid) -> Option<&ResolvedValue> {
        self.entries.get(&CacheKey::new(attribute, flow_id))
    }

    /// Caches a resolved value, returning any previous entry.
    pub fn insert(
        &mut self,
        attribute: &str,
        flow_id: Uuid,
        value: ResolvedValue,
    ) -> Option<ResolvedValue> {
        self.entries.insert(CacheKey::new(attribute, flow_id), value)
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::AttributeValue;

    #[test]
    fn keyed_by_attribute_and_flow() {
        let mut cache = AttemptCache::new();
        let flow_a = Uuid::now_v7();
        let flow_b = Uuid::now_v7();

        cache.insert(
            "company",
            flow_a,
            ResolvedValue::Value(AttributeValue::single("Acme")),
        );

        assert_eq!(
            cache.get("company", flow_a),
            Some(&ResolvedValue::Value(AttributeValue::single("Acme")))
        );
        assert_eq!(cache.get("company", flow_b), None);
        assert_eq!(cache.get("department", flow_a), None);
    }

    #[test]
    fn preserve_marker_is_cacheable() {
        let mut cache = AttemptCache::new();
        let flow_id = Uuid::now_v7();

        cache.insert("company", flow_id, ResolvedValue::Preserve);
        assert_eq!(cache.get("company", flow_id), Some(&ResolvedValue::Preserve));
    }

    #[test]
    fn insert_replaces() {
        let mut cache = AttemptCache::new();
        let flow_id = Uuid::now_v7();

        cache.insert("company", flow_id, ResolvedValue::Preserve);
        let previous = cache.insert(
            "company",
            flow_id,
            ResolvedValue::Value(AttributeValue::single("Acme")),
        );

        assert_eq!(previous, Some(ResolvedValue::Preserve));
        assert_eq!(cache.len(), 1);
    }
}
