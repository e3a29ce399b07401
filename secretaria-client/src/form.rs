//! Form submission controller.
//!
//! Submitting runs tenant resolution, validation, transformation and the
//! backend write in that order. Failures are stored as the user-facing message;
//! nothing escapes `submit`.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use secretaria_core::{
    prepare_course, prepare_teacher, Clock, CourseForm, CourseId, CourseUpdate, SecretariatId,
    TeacherForm, TeacherId, TeacherUpdate,
};

use crate::error::ClientResult;
use crate::loading::LoadingFlag;
use crate::resources::{CourseResource, TeacherResource};
use crate::session::TenantResolver;

/// Connects a form shape to the resource that persists it.
#[async_trait]
pub trait FormBinding: Send + Sync {
    type Fields: Default + Clone + Send + Sync;
    type Id: Display + Clone + Send + Sync;

    const CREATED_MESSAGE: &'static str;
    const UPDATED_MESSAGE: &'static str;

    /// Validate and transform `fields`, then create the record under `tenant`.
    async fn create(&self, fields: &Self::Fields, tenant: &SecretariatId) -> ClientResult<()>;

    /// Validate and transform `fields`, then overwrite record `id`.
    async fn update(
        &self,
        id: &Self::Id,
        fields: &Self::Fields,
        tenant: &SecretariatId,
    ) -> ClientResult<()>;
}

pub struct TeacherFormBinding {
    resource: Arc<TeacherResource>,
}

impl TeacherFormBinding {
    pub fn new(resource: Arc<TeacherResource>) -> Self {
        Self { resource }
    }
}

#[async_trait]
impl FormBinding for TeacherFormBinding {
    type Fields = TeacherForm;
    type Id = TeacherId;

    const CREATED_MESSAGE: &'static str = "Professor cadastrado com sucesso!";
    const UPDATED_MESSAGE: &'static str = "Professor atualizado com sucesso!";

    async fn create(&self, fields: &TeacherForm, tenant: &SecretariatId) -> ClientResult<()> {
        let dto = prepare_teacher(fields, tenant)?;
        self.resource.create(&dto).await?;
        Ok(())
    }

    async fn update(
        &self,
        id: &TeacherId,
        fields: &TeacherForm,
        tenant: &SecretariatId,
    ) -> ClientResult<()> {
        let update = TeacherUpdate::from(prepare_teacher(fields, tenant)?);
        self.resource.update(id, &update).await?;
        Ok(())
    }
}

pub struct CourseFormBinding {
    resource: Arc<CourseResource>,
    clock: Arc<dyn Clock>,
}

impl CourseFormBinding {
    pub fn new(resource: Arc<CourseResource>, clock: Arc<dyn Clock>) -> Self {
        Self { resource, clock }
    }
}

#[async_trait]
impl FormBinding for CourseFormBinding {
    type Fields = CourseForm;
    type Id = CourseId;

    const CREATED_MESSAGE: &'static str = "Curso cadastrado com sucesso!";
    const UPDATED_MESSAGE: &'static str = "Curso atualizado com sucesso!";

    async fn create(&self, fields: &CourseForm, tenant: &SecretariatId) -> ClientResult<()> {
        let dto = prepare_course(fields, tenant, self.clock.as_ref())?;
        self.resource.create(&dto).await?;
        Ok(())
    }

    async fn update(
        &self,
        id: &CourseId,
        fields: &CourseForm,
        tenant: &SecretariatId,
    ) -> ClientResult<()> {
        let dto = prepare_course(fields, tenant, self.clock.as_ref())?;
        self.resource.update(id, &CourseUpdate::from(dto)).await?;
        Ok(())
    }
}

/// Whether submitting creates a record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

pub struct FormController<B: FormBinding> {
    binding: B,
    resolver: Arc<TenantResolver>,
    mode: FormMode<B::Id>,
    fields: B::Fields,
    loading: LoadingFlag,
    error: Option<String>,
    success_message: Option<String>,
}

impl<B: FormBinding> FormController<B> {
    pub fn new(binding: B, resolver: Arc<TenantResolver>) -> Self {
        Self {
            binding,
            resolver,
            mode: FormMode::Create,
            fields: B::Fields::default(),
            loading: LoadingFlag::new(),
            error: None,
            success_message: None,
        }
    }

    /// Start in edit mode for record `id`, prefilled with `fields`.
    pub fn for_edit(binding: B, resolver: Arc<TenantResolver>, id: B::Id, fields: B::Fields) -> Self {
        Self {
            mode: FormMode::Edit(id),
            fields,
            ..Self::new(binding, resolver)
        }
    }

    pub fn fields(&self) -> &B::Fields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut B::Fields {
        &mut self.fields
    }

    pub fn set_fields(&mut self, fields: B::Fields) {
        self.fields = fields;
    }

    pub fn mode(&self) -> &FormMode<B::Id> {
        &self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn clear_messages(&mut self) {
        self.error = None;
        self.success_message = None;
    }

    /// Submit the current fields. Returns whether the write succeeded.
    ///
    /// A successful create resets the fields to their defaults; a successful
    /// edit keeps them.
    pub async fn submit(&mut self) -> bool {
        let _loading = self.loading.enter();
        self.clear_messages();

        match self.try_submit().await {
            Ok(message) => {
                info!(mode = self.mode_label(), "form submitted");
                self.success_message = Some(message.to_string());
                if matches!(self.mode, FormMode::Create) {
                    self.fields = B::Fields::default();
                }
                true
            }
            Err(err) => {
                warn!(mode = self.mode_label(), error = %err, "form submission failed");
                self.error = Some(err.user_message());
                false
            }
        }
    }

    async fn try_submit(&self) -> ClientResult<&'static str> {
        let tenant = self.resolver.resolve()?;
        match &self.mode {
            FormMode::Create => {
                self.binding.create(&self.fields, &tenant).await?;
                Ok(B::CREATED_MESSAGE)
            }
            FormMode::Edit(id) => {
                self.binding.update(id, &self.fields, &tenant).await?;
                Ok(B::UPDATED_MESSAGE)
            }
        }
    }

    fn mode_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "create",
            FormMode::Edit(_) => "edit",
        }
    }
}

pub type TeacherFormController = FormController<TeacherFormBinding>;
pub type CourseFormController = FormController<CourseFormBinding>;
