// Linewright - core/cache.rs
//
// Concurrent key/value maps and the per-line memo built on them.
//
// Two interchangeable strategies sit behind the `ConcurrentMap` trait:
//   - `RwLockMap`: one reader/writer lock around a single mutable map.
//   - `CopyOnWriteMap`: readers take an immutable snapshot and never wait on
//     a writer's copy; writers serialise on a mutex, copy the whole map,
//     modify the copy, and publish it.
// Callers choose a strategy at construction and see only the trait.

use crate::util::constants;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Capability interface shared by both map strategies.
///
/// Every operation is individually atomic. `range` iterates a snapshot of
/// the keys present when it is called; values are fetched afterwards, and a
/// key deleted in between is skipped rather than reported.
pub trait ConcurrentMap<K, V>: Send + Sync {
    /// Value stored for `key`, if any.
    fn load(&self, key: &K) -> Option<V>;

    /// Set the value for `key`.
    fn store(&self, key: K, value: V);

    /// Return the existing value for `key` if present (`true`), otherwise
    /// store `value` and return it (`false`).
    fn load_or_store(&self, key: K, value: V) -> (V, bool);

    /// Remove `key`, returning the value it had.
    fn load_and_delete(&self, key: &K) -> Option<V>;

    /// Remove `key`.
    fn delete(&self, key: &K);

    /// Call `f` for each entry until it returns `false`.
    fn range(&self, f: &mut dyn FnMut(&K, &V) -> bool);

    /// Number of entries at the time of the call.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Strategy selection
// =============================================================================

/// Backing strategy for a `ConcurrentMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapStrategy {
    #[default]
    RwLock,
    CopyOnWrite,
}

impl MapStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            MapStrategy::RwLock => "rwlock",
            MapStrategy::CopyOnWrite => "cow",
        }
    }
}

impl fmt::Display for MapStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MapStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rwlock" | "rw-lock" | "lock" => Ok(MapStrategy::RwLock),
            "cow" | "copy-on-write" | "snapshot" => Ok(MapStrategy::CopyOnWrite),
            other => Err(format!(
                "unknown cache strategy '{other}' (expected rwlock or cow)"
            )),
        }
    }
}

/// Build an empty map using `strategy`.
pub fn new_map<K, V>(strategy: MapStrategy) -> Box<dyn ConcurrentMap<K, V>>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    match strategy {
        MapStrategy::RwLock => Box::new(RwLockMap::new()),
        MapStrategy::CopyOnWrite => Box::new(CopyOnWriteMap::new()),
    }
}

// =============================================================================
// RwLockMap
// =============================================================================

/// Map guarded by a single reader/writer lock.
#[derive(Debug)]
pub struct RwLockMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for RwLockMap<K, V> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> RwLockMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, V> ConcurrentMap<K, V> for RwLockMap<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn load(&self, key: &K) -> Option<V> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key).cloned()
    }

    fn store(&self, key: K, value: V) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(key, value);
    }

    fn load_or_store(&self, key: K, value: V) -> (V, bool) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = map.get(&key) {
            return (existing.clone(), true);
        }
        map.insert(key, value.clone());
        (value, false)
    }

    fn load_and_delete(&self, key: &K) -> Option<V> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(key)
    }

    fn delete(&self, key: &K) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(key);
    }

    fn range(&self, f: &mut dyn FnMut(&K, &V) -> bool) {
        let keys: Vec<K> = {
            let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            map.keys().cloned().collect()
        };

        for key in keys {
            // Deleted since the key snapshot was taken.
            let Some(value) = self.load(&key) else {
                continue;
            };
            if !f(&key, &value) {
                break;
            }
        }
    }

    fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

// =============================================================================
// CopyOnWriteMap
// =============================================================================

/// Map whose readers consult an immutable snapshot.
///
/// The `clean` lock is held only long enough to clone or swap an `Arc`, so
/// readers never wait for a writer's full copy. Writers serialise on
/// `write_lock` and publish a new snapshot per write.
#[derive(Debug)]
pub struct CopyOnWriteMap<K, V> {
    write_lock: Mutex<()>,
    clean: RwLock<Arc<HashMap<K, V>>>,
}

impl<K, V> Default for CopyOnWriteMap<K, V> {
    fn default() -> Self {
        Self {
            write_lock: Mutex::new(()),
            clean: RwLock::new(Arc::new(HashMap::new())),
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

    fn snapshot(&self) -> Arc<HashMap<K, V>> {
        let clean = self.clean.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*clean)
    }

    fn publish(&self, map: HashMap<K, V>) {
        *self.clean.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(map);
    }

    /// Full copy of the current snapshot. Caller must hold `write_lock`.
    fn dirty(&self) -> HashMap<K, V> {
        let clean = self.snapshot();
        let mut dirty = HashMap::with_capacity(clean.len() + 1);
        dirty.extend(clean.iter().map(|(k, v)| (k.clone(), v.clone())));
        dirty
    }
}

impl<K, V> ConcurrentMap<K, V> for CopyOnWriteMap<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn load(&self, key: &K) -> Option<V> {
        self.snapshot().get(key).cloned()
    }

    fn store(&self, key: K, value: V) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut dirty = self.dirty();
        dirty.insert(key, value);
        self.publish(dirty);
    }

    fn load_or_store(&self, key: K, value: V) -> (V, bool) {
        if let Some(existing) = self.snapshot().get(&key) {
            return (existing.clone(), true);
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have stored the key while we waited.
        if let Some(existing) = self.snapshot().get(&key) {
            return (existing.clone(), true);
        }
        let mut dirty = self.dirty();
        dirty.insert(key, value.clone());
        self.publish(dirty);
        (value, false)
    }

    fn load_and_delete(&self, key: &K) -> Option<V> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut dirty = self.dirty();
        let value = dirty.remove(key);
        if value.is_some() {
            self.publish(dirty);
        }
        value
    }

    fn delete(&self, key: &K) {
        self.load_and_delete(key);
    }

    fn range(&self, f: &mut dyn FnMut(&K, &V) -> bool) {
        // The snapshot is immutable, so keys and values come from one instant.
        let clean = self.snapshot();
        for (k, v) in clean.iter() {
            if !f(k, v) {
                break;
            }
        }
    }

    fn len(&self) -> usize {
        self.snapshot().len()
    }
}

// =============================================================================
// Line memo
// =============================================================================

/// Hit/miss counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MemoStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Caches transformed lines keyed by their raw text.
///
/// Only valid for a single transform configuration; the pipeline owns one.
pub struct LineMemo {
    map: Box<dyn ConcurrentMap<String, String>>,
    strategy: MapStrategy,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl fmt::Debug for LineMemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineMemo")
            .field("strategy", &self.strategy)
            .field("stats", &self.stats())
            .finish()
    }
}

impl LineMemo {
    pub fn new(strategy: MapStrategy) -> Self {
        Self {
            map: new_map(strategy),
            strategy,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn strategy(&self) -> MapStrategy {
        self.strategy
    }

    /// Return the cached result for `line`, computing and storing it on a miss.
    ///
    /// Long lines bypass the cache, and nothing new is stored once the memo
    /// holds `MAX_CACHE_ENTRIES` entries.
    pub fn get_or_compute(&self, line: &str, compute: impl FnOnce(&str) -> String) -> String {
        if line.len() > constants::MAX_CACHED_LINE_BYTES {
            return compute(line);
        }

        let key = line.to_string();
        if let Some(hit) = self.map.load(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute(line);
        if self.map.len() >= constants::MAX_CACHE_ENTRIES {
            return value;
        }
        let (stored, _) = self.map.load_or_store(key, value);
        stored
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.map.len(),
        }
    }
}
