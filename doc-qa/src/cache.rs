//! Per-key time-bounded cache.
//!
//! Entries expire `ttl` after they were written. Expired entries are never
//! returned; they are dropped lazily on lookup misses and swept on every
//! write. Concurrent readers share a `tokio::sync::RwLock`.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use tracing::trace;

use crate::corpus::Corpus;

/// Monotonic time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same offset.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// String-keyed TTL cache.
#[derive(Debug)]
pub struct TtlCache<V, C = SystemClock> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    clock: C,
}

/// Cache of loaded product corpora keyed by product identifier.
pub type CorpusCache<C = SystemClock> = TtlCache<Corpus, C>;

impl<V: Clone> Default for TtlCache<V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> TtlCache<V, SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<V: Clone, C: Clock> TtlCache<V, C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Live value for `key`, if any.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        // re-check under the write lock; a writer may have refreshed it meanwhile
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
            trace!(key, "cache: evicted expired entry");
        }
        None
    }

    /// Stores `value` under `key` until `ttl` has elapsed, replacing any
    /// previous value.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.into(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn returns_value_before_expiry_only() {
        let clock = ManualClock::new();
        let cache = TtlCache::with_clock(clock.clone());

        cache.set("p1", 7u32, TTL).await;
        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get("p1").await, Some(7));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("p1").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn set_replaces_and_restarts_ttl() {
        let clock = ManualClock::new();
        let cache = TtlCache::with_clock(clock.clone());

        cache.set("p1", "old", TTL).await;
        clock.advance(Duration::from_secs(200));
        cache.set("p1", "new", TTL).await;
        clock.advance(Duration::from_secs(200));
        assert_eq!(cache.get("p1").await, Some("new"));
    }

    #[tokio::test]
    async fn writes_sweep_expired_entries() {
        let clock = ManualClock::new();
        let cache = TtlCache::with_clock(clock.clone());

        cache.set("a", 1, Duration::from_secs(10)).await;
        cache.set("b", 2, TTL).await;
        clock.advance(Duration::from_secs(11));
        cache.set("c", 3, TTL).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("b").await, Some(2));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = TtlCache::new();
        cache.set("a", 1, TTL).await;
        assert_eq!(cache.get("b").await, None);
        cache.clear().await;
        assert_eq!(cache.get("a").await, None);
    }
}
