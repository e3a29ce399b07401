//! Cache configuration.

use std::time::Duration;

use secretaria_core::EntityKind;

/// Default TTL for teacher and course lists.
pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(5 * 60);

/// Default TTL for the secretariat profile.
pub const DEFAULT_PROFILE_TTL: Duration = Duration::from_secs(10 * 60);

/// Per-kind time-to-live settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub teacher_ttl: Duration,
    pub course_ttl: Duration,
    pub secretariat_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            teacher_ttl: DEFAULT_LIST_TTL,
            course_ttl: DEFAULT_LIST_TTL,
            secretariat_ttl: DEFAULT_PROFILE_TTL,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TTL for one entity kind.
    pub fn with_ttl(mut self, kind: EntityKind, ttl: Duration) -> Self {
        match kind {
            EntityKind::Teacher => self.teacher_ttl = ttl,
            EntityKind::Course => self.course_ttl = ttl,
            EntityKind::Secretariat => self.secretariat_ttl = ttl,
        }
        self
    }

    /// Set every TTL to the same value.
    pub fn with_uniform_ttl(self, ttl: Duration) -> Self {
        EntityKind::ALL
            .into_iter()
            .fold(self, |config, kind| config.with_ttl(kind, ttl))
    }

    pub fn ttl_for(&self, kind: EntityKind) -> Duration {
        match kind {
            EntityKind::Teacher => self.teacher_ttl,
            EntityKind::Course => self.course_ttl,
            EntityKind::Secretariat => self.secretariat_ttl,
        }
    }
}
