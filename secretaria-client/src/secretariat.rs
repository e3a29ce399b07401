//! Profile of the signed-in secretariat.

use std::sync::{Arc, Mutex};

use tracing::debug;

use secretaria_cache::{TenantScopedKey, TtlCache};
use secretaria_core::{EntityKind, Secretariat, SecretariatId};

use crate::error::{map_transport_error, ClientError, ClientResult, SECRETARIAT_MESSAGES};
use crate::loading::LoadingFlag;
use crate::session::TenantResolver;
use crate::transport::{Backend, Method};

pub fn profile_path(id: &SecretariatId) -> String {
    format!("/secretaria/{}", id)
}

#[derive(Debug, Default)]
struct ProfileState {
    data: Option<Arc<Secretariat>>,
    error: Option<String>,
}

/// Name, email and id of the tenant, cached under [`EntityKind::Secretariat`].
pub struct SecretariatProfile {
    backend: Arc<dyn Backend>,
    cache: Arc<TtlCache>,
    resolver: Arc<TenantResolver>,
    loading: LoadingFlag,
    state: Mutex<ProfileState>,
}

impl std::fmt::Debug for SecretariatProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretariatProfile")
            .field("loading", &self.loading.is_loading())
            .field("state", &*self.lock())
            .finish()
    }
}

impl SecretariatProfile {
    pub fn new(
        backend: Arc<dyn Backend>,
        cache: Arc<TtlCache>,
        resolver: Arc<TenantResolver>,
    ) -> Self {
        Self {
            backend,
            cache,
            resolver,
            loading: LoadingFlag::new(),
            state: Mutex::new(ProfileState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ProfileState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn data(&self) -> Option<Arc<Secretariat>> {
        self.lock().data.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    fn key(tenant: &SecretariatId) -> TenantScopedKey {
        TenantScopedKey::new(tenant.clone(), EntityKind::Secretariat)
    }

    /// Resolve the tenant and read its profile through the cache.
    ///
    /// On failure the error is stored and the last loaded profile is kept.
    pub async fn load(&self) -> ClientResult<Arc<Secretariat>> {
        let _loading = self.loading.enter();
        self.lock().error = None;

        let result: ClientResult<Arc<Secretariat>> = async {
            let tenant = self.resolver.resolve()?;
            let path = profile_path(&tenant);
            let (backend, path_ref) = (&self.backend, path.as_str());
            let read = self
                .cache
                .get_or_fetch(Self::key(&tenant), move || async move {
                    let value = backend
                        .send(Method::Get, path_ref, None)
                        .await
                        .map_err(|e| map_transport_error(e, &SECRETARIAT_MESSAGES))?;
                    serde_json::from_value::<Secretariat>(value)
                        .map_err(|e| ClientError::Decode(e.to_string()))
                })
                .await?;
            debug!(tenant = %tenant, cache_hit = read.was_cache_hit(), "secretariat profile loaded");
            Ok(read.into_value())
        }
        .await;

        let mut state = self.lock();
        match result {
            Ok(profile) => {
                state.data = Some(Arc::clone(&profile));
                Ok(profile)
            }
            Err(err) => {
                state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Evict the cached profile, then load.
    pub async fn refetch(&self) -> ClientResult<Arc<Secretariat>> {
        if let Ok(tenant) = self.resolver.resolve() {
            self.cache.invalidate(&Self::key(&tenant));
        }
        self.load().await
    }
}
