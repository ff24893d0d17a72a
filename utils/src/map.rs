use std::collections::hash_map::{Entry, Iter};
use std::hash::Hash;

use fnv::FnvHashMap;

/// Thin wrapper over an FNV keyed hash map, used for small keyed
/// tallies where the keys are short integers or enum tags.
#[derive(Clone, Debug)]
pub struct Map<K, V>(pub FnvHashMap<K, V>);

impl<K: Eq + Hash, V> Map<K, V> {
    pub fn new() -> Self {
        Self(FnvHashMap::<K, V>::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(FnvHashMap::with_capacity_and_hasher(capacity, Default::default()))
    }

    pub fn insert(&mut self, k: K, data: V) -> Option<V> {
        self.0.insert(k, data)
    }

    pub fn get(&self, k: &K) -> Option<&V> {
        self.0.get(k)
    }

    pub fn entry(&mut self, k: K) -> Entry<'_, K, V> {
        self.0.entry(k)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Eq + Hash, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V: Default + std::ops::AddAssign> Map<K, V> {
    /// Adds `v` to the value stored under `k`, inserting `V::default()` first if absent.
    pub fn accumulate(&mut self, k: K, v: V) {
        *self.0.entry(k).or_default() += v;
    }
}
