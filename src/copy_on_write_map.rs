use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

/// A map optimised for many readers and rare writers.
///
/// Readers work on an immutable snapshot; every write copies the map and
/// swaps the new version in.
#[derive(Debug)]
pub struct CopyOnWriteMap<K, V> {
    map: RwLock<Arc<HashMap<K, V>>>,
}

impl<K, V> Default for CopyOnWriteMap<K, V> {
    fn default() -> Self {
        Self {
            map: RwLock::new(Arc::new(HashMap::new())),
        }
    }
}

impl<K, V> CopyOnWriteMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// The current contents. Later writes do not affect the returned map.
    pub fn snapshot(&self) -> Arc<HashMap<K, V>> {
        Arc::clone(&self.map.read())
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.read().get(key).cloned()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    /// Insert, returning the previous value.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.update(|m| m.insert(key, value))
    }

    /// Insert only if `key` is absent; returns the existing value otherwise.
    pub fn insert_if_absent(&self, key: K, value: V) -> Option<V> {
        let mut guard = self.map.write();
        if let Some(existing) = guard.get(&key) {
            return Some(existing.clone());
        }
        let mut copy = HashMap::clone(&guard);
        copy.insert(key, value);
        *guard = Arc::new(copy);
        None
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut guard = self.map.write();
        if !guard.contains_key(key) {
            return None;
        }
        let mut copy = HashMap::clone(&guard);
        let removed = copy.remove(key);
        *guard = Arc::new(copy);
        removed
    }

    pub fn clear(&self) {
        *self.map.write() = Arc::new(HashMap::new());
    }

    fn update<R>(&self, f: impl FnOnce(&mut HashMap<K, V>) -> R) -> R {
        let mut guard = self.map.write();
        let mut copy = HashMap::clone(&guard);
        let r = f(&mut copy);
        *guard = Arc::new(copy);
        r
    }
}
