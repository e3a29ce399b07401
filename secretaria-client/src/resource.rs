//! Generic cache-backed entity resource.
//!
//! One [`EntityResource`] per entity kind, parameterised by a [`ResourceSpec`]
//! that supplies the record/DTO types, endpoint templates and error messages.
//!
//! Reads go through the shared [`TtlCache`] under the tenant's key. Writes
//! always invalidate that key after the backend accepts them; nothing is merged
//! into the cache optimistically.

use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use secretaria_cache::{TenantScopedKey, TtlCache};
use secretaria_core::{EntityKind, HasUpdates, SecretariatId};

use crate::error::{map_transport_error, ClientError, ClientResult, ErrorMessages};
use crate::loading::LoadingFlag;
use crate::transport::{Backend, Method};

/// Static description of one entity's REST surface.
pub trait ResourceSpec: Send + Sync + 'static {
    /// Record returned by list endpoints.
    type Record: DeserializeOwned + Clone + Send + Sync + 'static;
    /// Create payload.
    type Dto: Serialize + Send + Sync;
    /// Partial update payload.
    type Update: Serialize + HasUpdates + Send + Sync;
    /// Record identifier.
    type Id: Display + PartialEq + Clone + Send + Sync;

    const KIND: EntityKind;

    fn messages() -> &'static ErrorMessages;

    /// `POST` target for a new record owned by `tenant`.
    fn create_path(tenant: &SecretariatId) -> String;
    /// `GET` target listing every record owned by `tenant`.
    fn list_path(tenant: &SecretariatId) -> String;
    /// `PUT` / `DELETE` target for one record.
    fn item_path(id: &Self::Id) -> String;

    fn dto_tenant(dto: &Self::Dto) -> &SecretariatId;
    fn update_tenant(update: &Self::Update) -> Option<&SecretariatId>;
    fn record_id(record: &Self::Record) -> &Self::Id;
}

/// Cache-backed CRUD for one entity kind.
pub struct EntityResource<S: ResourceSpec> {
    backend: Arc<dyn Backend>,
    cache: Arc<TtlCache>,
    loading: LoadingFlag,
    error: Mutex<Option<String>>,
    _spec: PhantomData<fn() -> S>,
}

impl<S: ResourceSpec> std::fmt::Debug for EntityResource<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityResource")
            .field("kind", &S::KIND)
            .field("loading", &self.loading.is_loading())
            .finish()
    }
}

impl<S: ResourceSpec> EntityResource<S> {
    pub fn new(backend: Arc<dyn Backend>, cache: Arc<TtlCache>) -> Self {
        Self {
            backend,
            cache,
            loading: LoadingFlag::new(),
            error: Mutex::new(None),
            _spec: PhantomData,
        }
    }

    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.cache
    }

    pub fn key(tenant: &SecretariatId) -> TenantScopedKey {
        TenantScopedKey::new(tenant.clone(), S::KIND)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    fn set_error(&self, message: Option<String>) {
        *self.error.lock().unwrap_or_else(|e| e.into_inner()) = message;
    }

    fn fail<T>(&self, err: ClientError) -> ClientResult<T> {
        self.set_error(Some(err.user_message()));
        Err(err)
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> ClientResult<Value> {
        self.backend
            .send(method, path, body)
            .await
            .map_err(|e| map_transport_error(e, S::messages()))
    }

    fn encode<T: Serialize>(value: &T) -> ClientResult<Value> {
        serde_json::to_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Decode a write response into a record. Bodies that are not a record
    /// (acknowledgements, empty 204s) yield `None`.
    fn decode_record(value: Value) -> Option<S::Record> {
        if value.is_null() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Reject empty and placeholder tenant ids before they reach a URL.
    fn checked_tenant(tenant: &SecretariatId) -> ClientResult<SecretariatId> {
        Ok(SecretariatId::parse(tenant.as_str())?)
    }

    /// Create a record and invalidate the owning tenant's list.
    pub async fn create(&self, dto: &S::Dto) -> ClientResult<Option<S::Record>> {
        let _loading = self.loading.enter();
        self.set_error(None);

        let result: ClientResult<Option<S::Record>> = async {
            let tenant = Self::checked_tenant(S::dto_tenant(dto))?;
            let body = Self::encode(dto)?;
            let response = self
                .send(Method::Post, &S::create_path(&tenant), Some(body))
                .await?;
            self.cache.invalidate(&Self::key(&tenant));
            info!(entity = %S::KIND, tenant = %tenant, "record created");
            Ok(Self::decode_record(response))
        }
        .await;

        result.or_else(|e| self.fail(e))
    }

    /// List the tenant's records, served from cache while the entry is live.
    pub async fn list(&self, tenant: &SecretariatId) -> ClientResult<Arc<Vec<S::Record>>> {
        let _loading = self.loading.enter();
        self.set_error(None);

        let result: ClientResult<Arc<Vec<S::Record>>> = async {
            let tenant = Self::checked_tenant(tenant)?;
            let path = S::list_path(&tenant);
            let (this, path_ref) = (self, path.as_str());
            let read = self
                .cache
                .get_or_fetch(Self::key(&tenant), move || async move {
                    let value = this.send(Method::Get, path_ref, None).await?;
                    decode_list::<S::Record>(value)
                })
                .await?;
            debug!(
                entity = %S::KIND,
                tenant = %tenant,
                cache_hit = read.was_cache_hit(),
                count = read.value().len(),
                "list loaded"
            );
            Ok(read.into_value())
        }
        .await;

        result.or_else(|e| self.fail(e))
    }

    /// Apply a partial update. Invalidates the tenant named in the update, if any.
    pub async fn update(&self, id: &S::Id, update: &S::Update) -> ClientResult<Option<S::Record>> {
        let _loading = self.loading.enter();
        self.set_error(None);

        let result: ClientResult<Option<S::Record>> = async {
            if !update.has_any_updates() {
                return Err(ClientError::EmptyUpdate);
            }
            let body = Self::encode(update)?;
            let response = self.send(Method::Put, &S::item_path(id), Some(body)).await?;
            if let Some(tenant) = S::update_tenant(update) {
                self.cache.invalidate(&Self::key(tenant));
            }
            info!(entity = %S::KIND, id = %id, "record updated");
            Ok(Self::decode_record(response))
        }
        .await;

        result.or_else(|e| self.fail(e))
    }

    /// Delete a record and invalidate `tenant`'s list.
    pub async fn delete(&self, id: &S::Id, tenant: &SecretariatId) -> ClientResult<()> {
        let _loading = self.loading.enter();
        self.set_error(None);

        let result: ClientResult<()> = async {
            let tenant = Self::checked_tenant(tenant)?;
            self.send(Method::Delete, &S::item_path(id), None).await?;
            self.cache.invalidate(&Self::key(&tenant));
            info!(entity = %S::KIND, id = %id, tenant = %tenant, "record deleted");
            Ok(())
        }
        .await;

        result.or_else(|e| self.fail(e))
    }

    /// Drop the tenant's cached list so the next `list` refetches.
    pub fn evict(&self, tenant: &SecretariatId) -> bool {
        self.cache.invalidate(&Self::key(tenant))
    }
}

/// Decode a list body. A `null` body is an empty list.
fn decode_list<T: DeserializeOwned>(value: Value) -> ClientResult<Vec<T>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}
