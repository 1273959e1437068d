//! Bounded least-recently-used cache shared between tagging threads.
//!
//! Every lookup stamps the entry with a monotonically increasing tick; when an
//! insert pushes the cache past its capacity the entry with the oldest tick is
//! evicted. Capacity is fixed at construction.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

struct Inner<K, V> {
    entries: HashMap<K, (V, u64)>,
    by_tick: BTreeMap<u64, K>,
    tick: u64,
}

impl<K: Clone + Eq + Hash, V> Inner<K, V> {
    fn touch(&mut self, key: &K) -> Option<&V> {
        self.tick += 1;
        let tick = self.tick;
        let (_, stamp) = self.entries.get_mut(key)?;
        let old = std::mem::replace(stamp, tick);
        self.by_tick.remove(&old);
        self.by_tick.insert(tick, key.clone());
        self.entries.get(key).map(|(v, _)| v)
    }

    fn evict_oldest(&mut self) {
        if let Some((_, key)) = self.by_tick.pop_first() {
            self.entries.remove(&key);
        }
    }
}

pub struct BoundedCache<K, V> {
    capacity: usize,
    inner: Mutex<Inner<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Clone + Eq + Hash, V: Clone> BoundedCache<K, V> {
    /// Panics if `capacity` is zero; settings validation rejects that earlier.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                by_tick: BTreeMap::new(),
                tick: 0,
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let found = inner.touch(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.tick += 1;
        let tick = inner.tick;
        if let Some((_, old_tick)) = inner.entries.insert(key.clone(), (value, tick)) {
            inner.by_tick.remove(&old_tick);
        }
        inner.by_tick.insert(tick, key);
        while inner.entries.len() > self.capacity {
            inner.evict_oldest();
        }
    }

    /// Return the cached value, computing and inserting it on a miss.
    ///
    /// The lock is not held while `compute` runs, so two threads missing on
    /// the same key may both compute it; the later insert wins.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(v) = self.get(&key) {
            return v;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.clear();
        inner.by_tick.clear();
    }

    /// (hits, misses) since construction.
    pub fn counters(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn evicts_least_recently_used() {
        let cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        // Touch "a" so "b" becomes the oldest.
        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn reinsert_replaces_without_growing() {
        let cache = BoundedCache::new(3);
        cache.insert("a", 1);
        cache.insert("a", 10);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"a"), Some(10));
    }

    #[test]
    fn never_exceeds_capacity() {
        let cache = BoundedCache::new(16);
        for i in 0..1000 {
            cache.insert(i, i * 2);
            assert!(cache.len() <= 16);
        }
        // The most recent entries survive.
        assert_eq!(cache.get(&999), Some(1998));
        assert_eq!(cache.get(&0), None);
    }

    #[test]
    fn get_or_insert_with_computes_once() {
        let cache = BoundedCache::new(4);
        let mut calls = 0;
        let v = cache.get_or_insert_with("k", || {
            calls += 1;
            7
        });
        assert_eq!(v, 7);
        let v = cache.get_or_insert_with("k", || unreachable!());
        assert_eq!(v, 7);
        assert_eq!(calls, 1);
        assert_eq!(cache.counters(), (1, 1));
    }

    #[test]
    fn clear_empties() {
        let cache = BoundedCache::new(4);
        cache.insert(1, 1);
        cache.clear();
        assert!(cache.is_empty());
        cache.insert(2, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(BoundedCache::new(64));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        cache.insert((t, i), i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 64);
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn zero_capacity_panics() {
        let _ = BoundedCache::<u32, u32>::new(0);
    }
}
