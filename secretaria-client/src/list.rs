//! List controller for one entity kind.
//!
//! Holds the tenant's records locally. `load` plays the role of mounting,
//! `teardown` of unmounting: once torn down, in-flight loads resolve as
//! cancelled and leave state untouched.

use std::sync::Arc;

use tracing::debug;

use secretaria_core::{CourseStats, SecretariatId};

use crate::cancel::CancelToken;
use crate::error::{ClientError, ClientResult};
use crate::loading::LoadingFlag;
use crate::resource::{EntityResource, ResourceSpec};
use crate::resources::{CourseSpec, TeacherSpec};
use crate::session::TenantResolver;

pub struct ListController<S: ResourceSpec> {
    resource: Arc<EntityResource<S>>,
    resolver: Arc<TenantResolver>,
    items: Vec<S::Record>,
    tenant: Option<SecretariatId>,
    loading: LoadingFlag,
    error: Option<String>,
    cancel: CancelToken,
}

impl<S: ResourceSpec> ListController<S> {
    pub fn new(resource: Arc<EntityResource<S>>, resolver: Arc<TenantResolver>) -> Self {
        Self {
            resource,
            resolver,
            items: Vec::new(),
            tenant: None,
            loading: LoadingFlag::new(),
            error: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn items(&self) -> &[S::Record] {
        &self.items
    }

    pub fn tenant(&self) -> Option<&SecretariatId> {
        self.tenant.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Token that tears this controller down from another task.
    pub fn cancel_handle(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Resolve the tenant and fetch its records. Without a tenant nothing is
    /// fetched, no error is recorded, and records of a previous tenant are dropped.
    pub async fn load(&mut self) -> ClientResult<()> {
        match self.resolver.resolve() {
            Ok(tenant) => {
                self.tenant = Some(tenant.clone());
                self.fetch(&tenant).await
            }
            Err(_) => {
                debug!(entity = %S::KIND, "no tenant, skipping load");
                self.tenant = None;
                self.items.clear();
                Ok(())
            }
        }
    }

    /// Re-resolve the tenant and reload only if it changed. Returns whether a
    /// load ran.
    pub async fn sync_tenant(&mut self) -> ClientResult<bool> {
        let current = self.resolver.resolve().ok();
        if current == self.tenant {
            return Ok(false);
        }
        debug!(
            entity = %S::KIND,
            from = ?self.tenant.as_ref().map(SecretariatId::as_str),
            to = ?current.as_ref().map(SecretariatId::as_str),
            "tenant changed"
        );
        self.tenant = current.clone();
        match current {
            Some(tenant) => self.fetch(&tenant).await.map(|_| true),
            None => {
                self.items.clear();
                Ok(false)
            }
        }
    }

    /// Evict the tenant's cached list, then load.
    pub async fn refetch(&mut self) -> ClientResult<()> {
        if let Ok(tenant) = self.resolver.resolve() {
            self.resource.evict(&tenant);
        }
        self.load().await
    }

    /// Delete record `id` and drop it from the local list. The list is not
    /// reloaded.
    pub async fn delete(&mut self, id: &S::Id) -> ClientResult<()> {
        let _loading = self.loading.enter();
        self.error = None;

        let tenant = match self.tenant.clone() {
            Some(tenant) => tenant,
            None => match self.resolver.resolve() {
                Ok(tenant) => tenant,
                Err(err) => return Err(self.record_failure(err.into())),
            },
        };

        let outcome = self
            .cancel
            .run(self.resource.delete(id, &tenant))
            .await
            .and_then(|inner| inner);
        match outcome {
            Ok(()) => {
                self.items.retain(|record| S::record_id(record) != id);
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => Err(self.record_failure(err)),
        }
    }

    /// Stop in-flight work. Idempotent.
    pub fn teardown(&self) {
        debug!(entity = %S::KIND, "list controller torn down");
        self.cancel.cancel();
    }

    async fn fetch(&mut self, tenant: &SecretariatId) -> ClientResult<()> {
        let _loading = self.loading.enter();
        self.error = None;

        let outcome = self
            .cancel
            .run(self.resource.list(tenant))
            .await
            .and_then(|inner| inner);
        match outcome {
            Ok(records) => {
                self.items = records.as_ref().clone();
                Ok(())
            }
            Err(ClientError::Cancelled) => {
                debug!(entity = %S::KIND, tenant = %tenant, "load cancelled, state untouched");
                Err(ClientError::Cancelled)
            }
            Err(err) => {
                self.items.clear();
                Err(self.record_failure(err))
            }
        }
    }

    fn record_failure(&mut self, err: ClientError) -> ClientError {
        self.error = Some(err.user_message());
        err
    }
}

impl ListController<CourseSpec> {
    /// Totals over the loaded courses.
    pub fn stats(&self) -> CourseStats {
        CourseStats::from_courses(&self.items)
    }
}

pub type TeacherList = ListController<TeacherSpec>;
pub type CourseList = ListController<CourseSpec>;
