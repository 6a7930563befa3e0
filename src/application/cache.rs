//! In-memory memoization keyed by input fingerprint, with per-cache TTL.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

/// How long an entry stays valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    Forever,
    For(Duration),
}

impl Ttl {
    fn expires_at(&self, stored_at_ms: u64) -> Option<u64> {
        match self {
            Ttl::Forever => None,
            Ttl::For(ttl) => Some(stored_at_ms.saturating_add(ttl.as_millis() as u64)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// Value returned by the cache together with how it was obtained
#[derive(Debug, Clone)]
pub struct Cached<V> {
    pub value: V,
    pub status: CacheStatus,
}

impl<V> Cached<V> {
    pub fn is_hit(&self) -> bool {
        self.status == CacheStatus::Hit
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Option<u64>,
}

impl<V> Entry<V> {
    fn is_fresh(&self, now_ms: u64) -> bool {
        self.expires_at.is_none_or(|deadline| now_ms < deadline)
    }
}

/// Memo table. Values are handed out by clone, so store `Arc`s for
/// anything large.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    ttl: Ttl,
    entries: HashMap<K, Entry<V>>,
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V: Clone> MemoCache<K, V> {
    pub fn new(ttl: Ttl) -> Self {
        Self { ttl, entries: HashMap::new(), stats: CacheStats::default() }
    }

    /// Fresh value for `key`, or `None`
    pub fn get(&self, key: &K, now_ms: u64) -> Option<V> {
        self.entries.get(key).filter(|entry| entry.is_fresh(now_ms)).map(|entry| entry.value.clone())
    }

    /// Return the cached value or compute, store and return a new one.
    /// A failed computation stores nothing.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: K, now_ms: u64, compute: F) -> Result<Cached<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key, now_ms) {
            self.stats.hits += 1;
            return Ok(Cached { value, status: CacheStatus::Hit });
        }

        self.stats.misses += 1;
        let value = compute()?;
        self.entries.retain(|_, entry| entry.is_fresh(now_ms));
        self.entries.insert(key, Entry { value: value.clone(), expires_at: self.ttl.expires_at(now_ms) });
        Ok(Cached { value, status: CacheStatus::Miss })
    }

    pub fn get_or_insert_with<F>(&mut self, key: K, now_ms: u64, compute: F) -> Cached<V>
    where
        F: FnOnce() -> V,
    {
        match self.get_or_try_insert_with(key, now_ms, || Ok::<V, std::convert::Infallible>(compute())) {
            Ok(cached) => cached,
            Err(never) => match never {},
        }
    }

    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Number of stored entries, expired ones included until the next insert
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
