//! Tenant-scoped cache keys.
//!
//! `TenantScopedKey` can only be built from a tenant id plus an entity kind, so
//! there is no way to address an unpartitioned entry.

use std::fmt;

use secretaria_core::{EntityKind, SecretariatId};

/// A cache key scoped to one secretariat and one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantScopedKey {
    inner: TenantKeyInner,
}

/// Private inner struct - prevents external construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TenantKeyInner {
    tenant: SecretariatId,
    kind: EntityKind,
}

impl TenantScopedKey {
    /// Create a new tenant-scoped key. This is the only constructor.
    pub fn new(tenant: SecretariatId, kind: EntityKind) -> Self {
        Self {
            inner: TenantKeyInner { tenant, kind },
        }
    }

    pub fn tenant(&self) -> &SecretariatId {
        &self.inner.tenant
    }

    pub fn kind(&self) -> EntityKind {
        self.inner.kind
    }

    /// True when this key belongs to `tenant`.
    pub fn is_for_tenant(&self, tenant: &SecretariatId) -> bool {
        &self.inner.tenant == tenant
    }
}

impl fmt::Display for TenantScopedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.inner.kind, self.inner.tenant)
    }
}
