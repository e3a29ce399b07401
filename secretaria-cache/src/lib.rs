//! Secretaria Cache - Tenant-Scoped TTL Cache
//!
//! Every entry is keyed by a [`TenantScopedKey`], so reads and invalidations
//! are always partitioned by secretariat. [`TtlCache`] is an explicit service
//! object with an injected clock; reads return [`CacheRead`] so callers can see
//! whether they were served from cache.

pub mod config;
pub mod key;
pub mod read;
pub mod stats;
pub mod ttl;

pub use config::{CacheConfig, DEFAULT_LIST_TTL, DEFAULT_PROFILE_TTL};
pub use key::TenantScopedKey;
pub use read::CacheRead;
pub use stats::CacheStats;
pub use ttl::TtlCache;
