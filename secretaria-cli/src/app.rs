//! Composition root: one cache, one backend, the resources built on them.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use secretaria_cache::TtlCache;
use secretaria_client::{
    Backend, ClientConfig, ClientError, CourseFormBinding, CourseFormController, CourseList,
    CourseResource, FormBinding, FormController, ListController, ResourceSpec, SecretariatProfile,
    SessionStore, SessionUserSource, TeacherFormBinding, TeacherFormController, TeacherList,
    TeacherResource, TenantResolver,
};
use secretaria_core::{Clock, SessionError, SystemClock};

use crate::cli::Command;
use crate::error::{CliError, CliResult};

pub struct App {
    teachers: Arc<TeacherResource>,
    courses: Arc<CourseResource>,
    profile: SecretariatProfile,
    resolver: Arc<TenantResolver>,
    store: SessionStore,
    clock: Arc<dyn Clock>,
}

impl App {
    pub fn new(config: &ClientConfig, backend: Arc<dyn Backend>) -> Self {
        Self::with_clock(config, backend, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &ClientConfig, backend: Arc<dyn Backend>, clock: Arc<dyn Clock>) -> Self {
        let cache = Arc::new(TtlCache::new(config.cache_config(), Arc::clone(&clock)));
        let user = SessionUserSource::new(config.session.user_id.clone());
        let resolver = Arc::new(TenantResolver::from_config(&config.session, user));
        info!(sources = ?resolver.source_names(), "tenant resolver ready");

        Self {
            teachers: Arc::new(TeacherResource::new(Arc::clone(&backend), Arc::clone(&cache))),
            courses: Arc::new(CourseResource::new(Arc::clone(&backend), Arc::clone(&cache))),
            profile: SecretariatProfile::new(backend, cache, Arc::clone(&resolver)),
            resolver,
            store: SessionStore::new(config.session.storage_path.clone()),
            clock,
        }
    }

    /// Run one command, returning what to print on stdout.
    pub async fn run(&self, command: Command) -> CliResult<String> {
        match command {
            Command::Profile => {
                let profile = self.profile.load().await?;
                render(&*profile)
            }
            Command::TeacherList => {
                let mut list = TeacherList::new(Arc::clone(&self.teachers), Arc::clone(&self.resolver));
                load_list(&mut list).await?;
                render(list.items())
            }
            Command::TeacherCreate { form } => {
                let mut controller = TeacherFormController::new(
                    TeacherFormBinding::new(Arc::clone(&self.teachers)),
                    Arc::clone(&self.resolver),
                );
                controller.set_fields(read_form(&form)?);
                submit(controller).await
            }
            Command::TeacherDelete { id } => {
                let mut list = TeacherList::new(Arc::clone(&self.teachers), Arc::clone(&self.resolver));
                list.delete(&id).await?;
                Ok(format!("Professor {} removido.", id))
            }
            Command::CourseList => {
                let mut list = CourseList::new(Arc::clone(&self.courses), Arc::clone(&self.resolver));
                load_list(&mut list).await?;
                render(list.items())
            }
            Command::CourseStats => {
                let mut list = CourseList::new(Arc::clone(&self.courses), Arc::clone(&self.resolver));
                load_list(&mut list).await?;
                render(&list.stats())
            }
            Command::CourseCreate { form } => {
                let mut controller = CourseFormController::new(
                    CourseFormBinding::new(Arc::clone(&self.courses), Arc::clone(&self.clock)),
                    Arc::clone(&self.resolver),
                );
                controller.set_fields(read_form(&form)?);
                submit(controller).await
            }
            Command::CourseDelete { id } => {
                let mut list = CourseList::new(Arc::clone(&self.courses), Arc::clone(&self.resolver));
                list.delete(&id).await?;
                Ok(format!("Curso {} removido.", id))
            }
            Command::SessionSet { tenant } => {
                self.store.set_tenant(&tenant)?;
                Ok(format!("Secretaria {} selecionada.", tenant))
            }
            Command::SessionClear => {
                if self.store.clear_tenant()? {
                    Ok("Secretaria esquecida.".to_string())
                } else {
                    Ok("Nenhuma secretaria selecionada.".to_string())
                }
            }
        }
    }
}

/// Load a list, treating a missing tenant as a session error.
async fn load_list<S: ResourceSpec>(list: &mut ListController<S>) -> CliResult<()> {
    list.load().await?;
    if list.tenant().is_none() {
        return Err(ClientError::from(SessionError::MissingTenant).into());
    }
    Ok(())
}

async fn submit<B: FormBinding>(mut controller: FormController<B>) -> CliResult<String> {
    if controller.submit().await {
        Ok(controller.success_message().unwrap_or_default().to_string())
    } else {
        Err(CliError::Rejected(
            controller.error().unwrap_or_default().to_string(),
        ))
    }
}

fn read_form<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let form_error = |reason: String| CliError::Form {
        path: path.to_path_buf(),
        reason,
    };
    let contents = std::fs::read_to_string(path).map_err(|e| form_error(e.to_string()))?;
    toml::from_str(&contents).map_err(|e| form_error(e.to_string()))
}

fn render<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secretaria_client::{Method, SessionSection};
    use secretaria_core::{FixedClock, Status};
    use secretaria_test_utils::fixtures::{course, list_body, teacher, tenant};
    use secretaria_test_utils::MockBackend;
    use serde_json::json;

    fn app(dir: &Path, user_id: Option<&str>, mock: &MockBackend) -> App {
        let mut config = ClientConfig::for_base_url("http://localhost:3000");
        config.session = SessionSection {
            user_id: user_id.map(str::to_string),
            storage_path: dir.join("session.json"),
            ..SessionSection::default()
        };
        App::with_clock(
            &config,
            Arc::new(mock.clone()),
            Arc::new(FixedClock::from_epoch_secs(1_718_000_000)),
        )
    }

    #[tokio::test]
    async fn test_list_requires_a_tenant() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockBackend::new();
        let err = app(dir.path(), None, &mock).run(Command::TeacherList).await.unwrap_err();
        assert_eq!(err.to_string(), "Sessão inválida. Por favor, faça login novamente.");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_session_set_feeds_the_resolver() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockBackend::new();
        mock.on_json(Method::Get, "/professor/sec-1", list_body(&[teacher("p1")]));
        let app = app(dir.path(), None, &mock);

        app.run(Command::SessionSet { tenant: tenant() }).await.unwrap();
        let out = app.run(Command::TeacherList).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["id_professor"], "p1");

        assert_eq!(app.run(Command::SessionClear).await.unwrap(), "Secretaria esquecida.");
    }

    #[tokio::test]
    async fn test_course_create_from_toml_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let form = dir.path().join("curso.toml");
        std::fs::write(&form, "nome = \"Enfermagem\"\nduracao = \"36\"\n").unwrap();

        let mock = MockBackend::new();
        mock.on_json(Method::Post, "/curso/sec-1", json!(null)).on_json(
            Method::Get,
            "/curso/sec-1/secretaria",
            list_body(&[
                course("c1", &tenant(), 36, Status::Active),
                course("c2", &tenant(), 12, Status::Inactive),
            ]),
        );
        let app = app(dir.path(), Some("sec-1"), &mock);

        let out = app.run(Command::CourseCreate { form }).await.unwrap();
        assert_eq!(out, "Curso cadastrado com sucesso!");
        assert_eq!(mock.calls()[0].body.as_ref().unwrap()["data_alteracao"], "2024-06-10");

        let stats: serde_json::Value =
            serde_json::from_str(&app.run(Command::CourseStats).await.unwrap()).unwrap();
        assert_eq!(stats["total"], 2);
        assert_eq!(stats["average_duration"], 24);
    }

    #[tokio::test]
    async fn test_rejected_form_reports_validation_message() {
        let dir = tempfile::tempdir().unwrap();
        let form = dir.path().join("curso.toml");
        std::fs::write(&form, "nome = \"Enfermagem\"\nduracao = \"0\"\n").unwrap();

        let mock = MockBackend::new();
        let app = app(dir.path(), Some("sec-1"), &mock);
        let err = app.run(Command::CourseCreate { form }).await.unwrap_err();
        assert_eq!(err.to_string(), "Duração deve ser um número entre 1 e 60 meses");
        assert_eq!(mock.call_count(), 0);
    }
}
