//! In-memory TTL cache with read-through.
//!
//! Entries are `(payload, cached_at)` pairs keyed by [`TenantScopedKey`]. An
//! entry is live while `now - cached_at < ttl(kind)`; the clock is injected.
//! Payloads are stored as `Arc<dyn Any>` so one cache can hold teacher lists,
//! course lists and profiles side by side, and a hit hands back the same
//! allocation that was stored.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use secretaria_core::{Clock, SecretariatId, SystemClock, Timestamp};
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::key::TenantScopedKey;
use crate::read::CacheRead;
use crate::stats::{CacheStats, Counters};

type Payload = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
struct Entry {
    value: Payload,
    cached_at: Timestamp,
}

/// Explicit cache service object, owned by the composition root and shared by
/// reference (`Arc<TtlCache>`) with every resource.
pub struct TtlCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<TenantScopedKey, Entry>>,
    in_flight: Mutex<HashMap<TenantScopedKey, Arc<tokio::sync::Mutex<()>>>>,
    /// Bumped on every invalidation; a fetch that started under an older
    /// epoch does not write its result back.
    epoch: AtomicU64,
    counters: Counters,
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("config", &self.config)
            .field("entries", &self.len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl TtlCache {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            epoch: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    /// Cache driven by the system clock.
    pub fn with_system_clock(config: CacheConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn is_live(&self, key: &TenantScopedKey, cached_at: Timestamp, now: Timestamp) -> bool {
        let ttl = self.config.ttl_for(key.kind());
        match now.signed_duration_since(cached_at).to_std() {
            Ok(age) => age < ttl,
            // Entry stamped in the future (clock moved back): treat as fresh.
            Err(_) => true,
        }
    }

    /// Look up without touching counters. Expired entries are dropped.
    fn lookup<T>(&self, key: &TenantScopedKey) -> Option<CacheRead<Arc<T>>>
    where
        T: Any + Send + Sync,
    {
        let now = self.clock.now();
        let mut entries = lock(&self.entries);
        let entry = entries.get(key)?.clone();

        if !self.is_live(key, entry.cached_at, now) {
            entries.remove(key);
            Counters::bump(&self.counters.evictions, 1);
            debug!(key = %key, "cache entry expired");
            return None;
        }

        match entry.value.downcast::<T>() {
            Ok(value) => Some(CacheRead::from_cache(value, entry.cached_at)),
            Err(_) => {
                debug!(key = %key, "cache entry holds a different type");
                None
            }
        }
    }

    fn record(&self, hit: bool, key: &TenantScopedKey) {
        if hit {
            Counters::bump(&self.counters.hits, 1);
            trace!(key = %key, "cache hit");
        } else {
            Counters::bump(&self.counters.misses, 1);
            trace!(key = %key, "cache miss");
        }
    }

    /// Read a live entry. Returns `None` when absent, expired or of another type.
    pub fn get<T>(&self, key: &TenantScopedKey) -> Option<CacheRead<Arc<T>>>
    where
        T: Any + Send + Sync,
    {
        let read = self.lookup::<T>(key);
        self.record(read.is_some(), key);
        read
    }

    /// Store a value with a fresh timestamp, replacing any existing entry.
    pub fn put<T>(&self, key: TenantScopedKey, value: T) -> Arc<T>
    where
        T: Any + Send + Sync,
    {
        let value = Arc::new(value);
        self.put_arc(key, Arc::clone(&value));
        value
    }

    /// Store an already shared value.
    pub fn put_arc<T>(&self, key: TenantScopedKey, value: Arc<T>)
    where
        T: Any + Send + Sync,
    {
        let cached_at = self.clock.now();
        debug!(key = %key, "cache put");
        lock(&self.entries).insert(key, Entry { value, cached_at });
    }

    pub fn contains(&self, key: &TenantScopedKey) -> bool {
        lock(&self.entries).contains_key(key)
    }

    /// Remove one entry. Returns true if something was removed.
    pub fn invalidate(&self, key: &TenantScopedKey) -> bool {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let removed = lock(&self.entries).remove(key).is_some();
        if removed {
            Counters::bump(&self.counters.invalidations, 1);
        }
        debug!(key = %key, removed, "cache invalidate");
        removed
    }

    /// Remove every entry belonging to `tenant`. Returns how many were removed.
    pub fn invalidate_tenant(&self, tenant: &SecretariatId) -> usize {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|key, _| !key.is_for_tenant(tenant));
        let removed = before - entries.len();
        Counters::bump(&self.counters.invalidations, removed as u64);
        debug!(tenant = %tenant, removed, "cache invalidate tenant");
        removed
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let mut entries = lock(&self.entries);
        let removed = entries.len();
        entries.clear();
        Counters::bump(&self.counters.invalidations, removed as u64);
        debug!(removed, "cache cleared");
    }

    /// Drop all expired entries. Returns how many were evicted.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|key, entry| self.is_live(key, entry.cached_at, now));
        let evicted = before - entries.len();
        Counters::bump(&self.counters.evictions, evicted as u64);
        if evicted > 0 {
            debug!(evicted, "purged expired cache entries");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.len())
    }

    /// TTL that applies to `key`.
    pub fn ttl_for(&self, key: &TenantScopedKey) -> Duration {
        self.config.ttl_for(key.kind())
    }

    fn flight_gate(&self, key: &TenantScopedKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut in_flight = lock(&self.in_flight);
        Arc::clone(in_flight.entry(key.clone()).or_default())
    }

    fn release_gate(&self, key: &TenantScopedKey, gate: &Arc<tokio::sync::Mutex<()>>) {
        let mut in_flight = lock(&self.in_flight);
        // One reference here, one in the map: nobody else is queued.
        if Arc::strong_count(gate) <= 2 {
            in_flight.remove(key);
        }
    }

    /// Read-through: serve a live entry, otherwise run `fetch` and cache its output.
    ///
    /// Concurrent callers for the same key share one fetch. The first caller
    /// runs it; the rest wait and then read what it stored. Fetch errors are
    /// returned to the caller that ran the fetch and are not cached, so a
    /// waiting caller then fetches on its own.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: TenantScopedKey,
        fetch: F,
    ) -> Result<CacheRead<Arc<T>>, E>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.lookup::<T>(&key) {
            self.record(true, &key);
            return Ok(hit);
        }

        let gate = self.flight_gate(&key);
        let result = {
            let _leader = gate.lock().await;

            if let Some(hit) = self.lookup::<T>(&key) {
                self.record(true, &key);
                debug!(key = %key, "served by coalesced fetch");
                Ok(hit)
            } else {
                self.record(false, &key);
                let epoch = self.epoch.load(Ordering::SeqCst);
                match fetch().await {
                    Ok(value) => {
                        let value = Arc::new(value);
                        let fetched_at = self.clock.now();
                        if self.epoch.load(Ordering::SeqCst) == epoch {
                            self.put_arc(key.clone(), Arc::clone(&value));
                        } else {
                            debug!(key = %key, "invalidated during fetch, result not cached");
                        }
                        Ok(CacheRead::from_fetch(value, fetched_at))
                    }
                    Err(err) => Err(err),
                }
            }
        };

        self.release_gate(&key, &gate);
        result
    }
}
