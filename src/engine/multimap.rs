//! Insertion-ordered multimap.
//!
//! Keys are numbered in the order they are first seen; each key keeps the
//! values put under it in insertion order. The search walks keys by that
//! first-seen index rather than by hash order.

use std::collections::HashMap;
use std::hash::Hash;

/// Multimap preserving first-seen key order and per-key value order.
#[derive(Debug, Clone)]
pub struct OrderedMultimap<K, V> {
    index: HashMap<K, usize>,
    keys: Vec<K>,
    values: Vec<Vec<V>>,
}

impl<K, V> Default for OrderedMultimap<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            keys: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> OrderedMultimap<K, V> {
    /// Create an empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` under `key`.
    ///
    /// Returns the key's first-seen index and whether this call inserted the
    /// key for the first time.
    pub fn put(&mut self, key: K, value: V) -> (usize, bool) {
        if let Some(&slot) = self.index.get(&key) {
            self.values[slot].push(value);
            return (slot, false);
        }
        let slot = self.keys.len();
        self.index.insert(key.clone(), slot);
        self.keys.push(key);
        self.values.push(vec![value]);
        (slot, true)
    }

    /// Values stored under `key`, in insertion order. Empty when absent.
    #[must_use]
    pub fn get(&self, key: &K) -> &[V] {
        self.index
            .get(key)
            .map_or(&[][..], |&slot| self.values[slot].as_slice())
    }

    /// First-seen index of `key`.
    #[must_use]
    pub fn slot_of(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Values stored under the key with first-seen index `slot`.
    #[must_use]
    pub fn values_at(&self, slot: usize) -> &[V] {
        self.values.get(slot).map_or(&[][..], Vec::as_slice)
    }

    /// Keys in first-seen order.
    #[must_use]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key has been put.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
