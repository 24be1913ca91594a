//! The tagged, versioned TTL LRU cache.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lumen_core::{Clock, SystemClock, Timestamp};
use regex::Regex;

use crate::config::CacheConfig;

/// A single cached value with its bookkeeping.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    written_at: Timestamp,
    /// Invariant: `last_accessed_at >= written_at`.
    last_accessed_at: Timestamp,
    hit_count: u64,
    tags: HashSet<String>,
    /// Cache version at write time. Compared against the live counter to
    /// implement O(1) bulk invalidation.
    version_stamp: u64,
    /// Monotonic insertion sequence, breaks LRU ties.
    insert_seq: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    hits: u64,
    misses: u64,
    sets: u64,
    evictions: u64,
    invalidations: u64,
}

#[derive(Debug)]
struct CacheState<T> {
    entries: HashMap<String, CacheEntry<T>>,
    /// tag -> keys carrying that tag. Invariant: every indexed key exists in
    /// `entries` and that entry's tag set contains the tag.
    tag_index: HashMap<String, HashSet<String>>,
    /// Monotonic; never reset, not even by `clear()`, so pre-clear entries
    /// can never resurrect as valid.
    current_version: u64,
    next_seq: u64,
    counters: Counters,
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of writes.
    pub sets: u64,
    /// Number of evictions due to capacity.
    pub evictions: u64,
    /// Number of entries removed by explicit invalidation.
    pub invalidations: u64,
    /// Number of entries currently in cache.
    pub size: usize,
    /// Approximate memory usage in bytes.
    pub approx_memory_bytes: usize,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Generic tagged, versioned, TTL-based LRU cache.
///
/// An entry is *logically present* only if it is younger than the TTL
/// (measured from last access) and its version stamp matches the cache's
/// current version. Stale entries are purged when a read touches them, or
/// in bulk by [`cleanup`](Self::cleanup).
///
/// All state lives behind a `Mutex`, so the cache can be shared behind an
/// `Arc` across tasks and threads. The guard is never held across an await.
pub struct TaggedCache<T: Clone> {
    state: Mutex<CacheState<T>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> TaggedCache<T> {
    /// Create a cache with the given configuration and the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an injected clock.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                tag_index: HashMap::new(),
                current_version: 0,
                next_seq: 0,
                counters: Counters::default(),
            }),
            config,
            clock,
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a value. A hit bumps the entry's recency and hit count; a
    /// stale or expired entry is purged and counts as a miss.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let mut guard = self.lock();
        let state = &mut *guard;
        let version = state.current_version;

        let fresh = match state.entries.get(key) {
            None => {
                state.counters.misses += 1;
                return None;
            }
            Some(entry) => is_fresh(entry, now, self.config.ttl, version),
        };

        if !fresh {
            purge(state, key);
            state.counters.misses += 1;
            return None;
        }

        match state.entries.get_mut(key) {
            Some(entry) => {
                entry.last_accessed_at = now;
                entry.hit_count += 1;
                debug_assert!(entry.last_accessed_at >= entry.written_at);
                let value = entry.value.clone();
                state.counters.hits += 1;
                Some(value)
            }
            None => {
                state.counters.misses += 1;
                None
            }
        }
    }

    /// Hit count of a physically present entry, stale or not. Diagnostics
    /// only; does not touch freshness, recency, or the counters.
    pub fn hit_count(&self, key: &str) -> Option<u64> {
        self.lock().entries.get(key).map(|entry| entry.hit_count)
    }

    /// Check logical presence without bumping recency or the hit/miss
    /// counters. A stale entry found here is purged, so `len()` stays
    /// consistent with what `get` would report.
    pub fn has(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut guard = self.lock();
        let state = &mut *guard;
        let version = state.current_version;
        let fresh = match state.entries.get(key) {
            None => return false,
            Some(entry) => is_fresh(entry, now, self.config.ttl, version),
        };
        if !fresh {
            purge(state, key);
        }
        fresh
    }

    /// Insert or replace a value with the given tags.
    ///
    /// Inserting a new key at capacity first evicts the entry with the
    /// oldest last access (ties broken by insertion order).
    pub fn set(&self, key: impl Into<String>, value: T, tags: &[&str]) {
        let key = key.into();
        let now = self.clock.now();
        let mut guard = self.lock();
        let state = &mut *guard;

        if state.entries.contains_key(&key) {
            // Replacement: drop the old tag associations first.
            unindex_tags(state, &key);
        } else if state.entries.len() >= self.config.max_entries {
            if let Some(victim) = lru_victim(state) {
                purge(state, &victim);
                state.counters.evictions += 1;
            }
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        let version = state.current_version;
        let tag_set: HashSet<String> = tags.iter().map(|t| t.to_string()).collect();
        for tag in &tag_set {
            state
                .tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        state.entries.insert(
            key,
            CacheEntry {
                value,
                written_at: now,
                last_accessed_at: now,
                hit_count: 0,
                tags: tag_set,
                version_stamp: version,
                insert_seq: seq,
            },
        );
        state.counters.sets += 1;
    }

    /// Remove a single entry. Returns true if an entry was present.
    pub fn remove(&self, key: &str) -> bool {
        let mut guard = self.lock();
        let state = &mut *guard;
        let removed = purge(state, key);
        if removed {
            state.counters.invalidations += 1;
        }
        removed
    }

    /// Remove every entry carrying `tag`. Returns the number removed.
    pub fn invalidate_by_tag(&self, tag: &str) -> usize {
        let mut guard = self.lock();
        let state = &mut *guard;
        let keys: Vec<String> = match state.tag_index.remove(tag) {
            Some(keys) => keys.into_iter().collect(),
            None => return 0,
        };
        let mut removed = 0;
        for key in keys {
            if purge(state, &key) {
                removed += 1;
            }
        }
        state.counters.invalidations += removed as u64;
        removed
    }

    /// Remove every entry whose key matches `pattern`. Returns the number
    /// removed.
    pub fn invalidate_by_pattern(&self, pattern: &Regex) -> usize {
        let mut guard = self.lock();
        let state = &mut *guard;
        let keys: Vec<String> = state
            .entries
            .keys()
            .filter(|k| pattern.is_match(k))
            .cloned()
            .collect();
        let mut removed = 0;
        for key in keys {
            if purge(state, &key) {
                removed += 1;
            }
        }
        state.counters.invalidations += removed as u64;
        removed
    }

    /// Invalidate the entire cache in O(1) by bumping the version counter.
    ///
    /// Entries are not eagerly deleted; they become logical misses on next
    /// access and are purged then (or by [`cleanup`](Self::cleanup)).
    pub fn invalidate_version(&self) {
        let mut state = self.lock();
        state.current_version += 1;
    }

    /// Sweep out every entry that is expired by TTL or stale by version.
    /// Not required for correctness, only for bounding memory between
    /// accesses. Returns the number removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let mut guard = self.lock();
        let state = &mut *guard;
        let version = state.current_version;
        let stale: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| !is_fresh(entry, now, self.config.ttl, version))
            .map(|(key, _)| key.clone())
            .collect();
        let mut removed = 0;
        for key in stale {
            if purge(state, &key) {
                removed += 1;
            }
        }
        removed
    }

    /// Drop all entries and reset the counters. The version counter is NOT
    /// reset: entries written before a clear must never resurrect as valid.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.tag_index.clear();
        state.counters = Counters::default();
    }

    /// Number of entries physically held (stale entries included until they
    /// are purged).
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Point-in-time statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let approx_memory_bytes = state
            .entries
            .iter()
            .map(|(key, entry)| {
                std::mem::size_of::<CacheEntry<T>>()
                    + key.len()
                    + entry.tags.iter().map(|t| t.len()).sum::<usize>()
            })
            .sum();
        CacheStats {
            hits: state.counters.hits,
            misses: state.counters.misses,
            sets: state.counters.sets,
            evictions: state.counters.evictions,
            invalidations: state.counters.invalidations,
            size: state.entries.len(),
            approx_memory_bytes,
        }
    }
}

/// Logical presence check: fresh by TTL (from last access) and current by
/// version.
fn is_fresh<T>(entry: &CacheEntry<T>, now: Timestamp, ttl: Duration, version: u64) -> bool {
    if entry.version_stamp != version {
        return false;
    }
    let age = now
        .signed_duration_since(entry.last_accessed_at)
        .to_std()
        .unwrap_or(Duration::ZERO);
    age < ttl
}

/// Remove an entry and its tag-index references. Returns true if it existed.
fn purge<T>(state: &mut CacheState<T>, key: &str) -> bool {
    let entry = match state.entries.remove(key) {
        Some(entry) => entry,
        None => return false,
    };
    for tag in &entry.tags {
        if let Some(keys) = state.tag_index.get_mut(tag) {
            keys.remove(key);
            if keys.is_empty() {
                state.tag_index.remove(tag);
            }
        }
    }
    true
}

/// Drop a key's tag-index references without removing the entry itself.
fn unindex_tags<T>(state: &mut CacheState<T>, key: &str) {
    let tags: Vec<String> = state
        .entries
        .get(key)
        .map(|entry| entry.tags.iter().cloned().collect())
        .unwrap_or_default();
    for tag in tags {
        if let Some(keys) = state.tag_index.get_mut(&tag) {
            keys.remove(key);
            if keys.is_empty() {
                state.tag_index.remove(&tag);
            }
        }
    }
}

/// Pick the LRU victim: smallest last access, ties by insertion sequence.
fn lru_victim<T>(state: &CacheState<T>) -> Option<String> {
    state
        .entries
        .iter()
        .min_by_key(|(_, entry)| (entry.last_accessed_at, entry.insert_seq))
        .map(|(key, _)| key.clone())
}
