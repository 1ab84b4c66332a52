//! Bounded least-recently-used cache with per-key single-flight builds.
//!
//! At most one build runs per key at a time. Callers that arrive while a
//! build is in flight wait on that key's gate and then read the stored value.
//! Builds for different keys proceed in parallel; the shared LRU state is
//! only locked for lookups and inserts, never across a build.
//!
//! Failed builds are not stored. A waiter that finds nothing after the
//! builder finished runs the build itself.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Counters describing cache activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Successful builds.
    pub builds: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

#[derive(Debug)]
struct Slot<V> {
    value: Arc<V>,
    last_used: u64,
}

#[derive(Debug)]
struct Lru<K, V> {
    slots: HashMap<K, Slot<V>>,
    tick: u64,
    hits: u64,
    misses: u64,
    builds: u64,
    evictions: u64,
}

impl<K: Eq + Hash + Clone, V> Lru<K, V> {
    fn touch(&mut self, key: &K) -> Option<Arc<V>> {
        self.tick += 1;
        let tick = self.tick;
        self.slots.get_mut(key).map(|slot| {
            slot.last_used = tick;
            Arc::clone(&slot.value)
        })
    }

    fn insert(&mut self, key: K, value: Arc<V>, capacity: usize) {
        self.tick += 1;
        if !self.slots.contains_key(&key) && self.slots.len() >= capacity {
            let oldest = self
                .slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                self.slots.remove(&oldest);
                self.evictions += 1;
            }
        }
        self.slots.insert(
            key,
            Slot {
                value,
                last_used: self.tick,
            },
        );
        self.builds += 1;
    }
}

/// Thread-safe bounded cache of shared values.
#[derive(Debug)]
pub struct BoundedCache<K: Eq + Hash, V> {
    capacity: usize,
    lru: Mutex<Lru<K, V>>,
    gates: DashMap<K, Arc<Mutex<()>>>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// A cache holding at most `capacity` values (minimum one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lru: Mutex::new(Lru {
                slots: HashMap::new(),
                tick: 0,
                hits: 0,
                misses: 0,
                builds: 0,
                evictions: 0,
            }),
            gates: DashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached value for `key`, refreshing its recency.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut lru = self.lru.lock();
        let found = lru.touch(key);
        if found.is_some() {
            lru.hits += 1;
        }
        found
    }

    /// Return the cached value for `key`, building it with `build` on a miss.
    ///
    /// Concurrent callers for the same key share one build. Errors from
    /// `build` are returned to the caller that ran it and nothing is cached.
    pub fn get_or_try_insert_with<E, F>(&self, key: &K, build: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let gate = Arc::clone(
            self.gates
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        let outcome = {
            let _guard = gate.lock();
            match self.get(key) {
                Some(value) => Ok(value),
                None => {
                    self.lru.lock().misses += 1;
                    build().map(|value| {
                        let value = Arc::new(value);
                        self.lru
                            .lock()
                            .insert(key.clone(), Arc::clone(&value), self.capacity);
                        value
                    })
                }
            }
        };

        // Clones are only taken under the map's shard lock, so a count of one
        // here means no caller is waiting on or about to take this gate.
        drop(gate);
        self.gates.remove_if(key, |_, g| Arc::strong_count(g) == 1);
        outcome
    }

    /// Whether `key` currently holds a value. Does not affect recency.
    pub fn contains(&self, key: &K) -> bool {
        self.lru.lock().slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lru.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let lru = self.lru.lock();
        CacheStats {
            hits: lru.hits,
            misses: lru.misses,
            builds: lru.builds,
            evictions: lru.evictions,
            len: lru.slots.len(),
            capacity: self.capacity,
        }
    }
}
