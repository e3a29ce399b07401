//! Cache read results carrying hit/miss and age metadata.

use std::time::Duration;

use secretaria_core::Timestamp;

/// Result of a cache read.
///
/// Callers that only want the payload use `into_value`; logging and tests can
/// inspect whether the read was served from cache and how old it was.
#[derive(Debug, Clone)]
pub struct CacheRead<T> {
    value: T,
    cached_at: Timestamp,
    was_cache_hit: bool,
}

impl<T> CacheRead<T> {
    /// A read served from an existing entry.
    pub fn from_cache(value: T, cached_at: Timestamp) -> Self {
        Self {
            value,
            cached_at,
            was_cache_hit: true,
        }
    }

    /// A read that had to call through to the fetcher.
    pub fn from_fetch(value: T, fetched_at: Timestamp) -> Self {
        Self {
            value,
            cached_at: fetched_at,
            was_cache_hit: false,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn cached_at(&self) -> Timestamp {
        self.cached_at
    }

    /// Age of the data relative to `now`. Zero if `now` precedes the entry.
    pub fn age(&self, now: Timestamp) -> Duration {
        now.signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn was_cache_hit(&self) -> bool {
        self.was_cache_hit
    }

    pub fn was_cache_miss(&self) -> bool {
        !self.was_cache_hit
    }

    /// Map the inner value to a new type.
    pub fn map<U, F>(self, f: F) -> CacheRead<U>
    where
        F: FnOnce(T) -> U,
    {
        CacheRead {
            value: f(self.value),
            cached_at: self.cached_at,
            was_cache_hit: self.was_cache_hit,
        }
    }
}

impl<T> AsRef<T> for CacheRead<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
