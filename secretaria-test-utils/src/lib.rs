//! Secretaria Test Utilities
//!
//! Shared test infrastructure for the secretariat workspace:
//! - Proptest generators for documents and forms
//! - A scripted [`MockBackend`] standing in for the REST server
//! - Fixtures for records and valid forms

pub use secretaria_client::{Backend, Method, TransportError};
pub use secretaria_core::{
    Course, CourseForm, CourseId, Secretariat, SecretariatId, Sex, Status, Teacher, TeacherForm,
    TeacherId,
};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// MOCK BACKEND
// ============================================================================

/// One request seen by [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

pub type ScriptedResponse = Result<Value, TransportError>;

#[derive(Debug, Default)]
struct Route {
    queued: VecDeque<ScriptedResponse>,
    fallback: Option<ScriptedResponse>,
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(Method, String), Route>,
    calls: Vec<RecordedCall>,
    delay: Option<Duration>,
}

/// Scripted in-memory backend.
///
/// Each `(method, path)` answers queued responses first, then its standing
/// response. Unscripted routes answer 404. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every `send` before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().delay = Some(delay);
        self
    }

    /// Standing response for a route.
    pub fn on(&self, method: Method, path: &str, response: ScriptedResponse) -> &Self {
        self.route(method, path, |route| route.fallback = Some(response));
        self
    }

    pub fn on_json(&self, method: Method, path: &str, body: Value) -> &Self {
        self.on(method, path, Ok(body))
    }

    pub fn on_status(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.on(
            method,
            path,
            Err(TransportError::Status {
                status,
                body: body.to_string(),
            }),
        )
    }

    /// One-shot response, consumed before the standing one.
    pub fn enqueue(&self, method: Method, path: &str, response: ScriptedResponse) -> &Self {
        self.route(method, path, |route| route.queued.push_back(response));
        self
    }

    fn route(&self, method: Method, path: &str, apply: impl FnOnce(&mut Route)) {
        let mut state = self.state.lock().unwrap();
        apply(state.routes.entry((method, path.to_string())).or_default());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Number of requests made to one route.
    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    pub fn reset_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn answer(&self, method: Method, path: &str) -> ScriptedResponse {
        let mut state = self.state.lock().unwrap();
        let Some(route) = state.routes.get_mut(&(method, path.to_string())) else {
            return Err(TransportError::Status {
                status: 404,
                body: format!("no mock route for {} {}", method, path),
            });
        };
        if let Some(response) = route.queued.pop_front() {
            return response;
        }
        route.fallback.clone().unwrap_or_else(|| {
            Err(TransportError::Status {
                status: 404,
                body: format!("mock route {} {} exhausted", method, path),
            })
        })
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(RecordedCall {
                method,
                path: path.to_string(),
                body,
            });
            state.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.answer(method, path)
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for documents and forms.

    use super::*;
    use proptest::prelude::*;
    use secretaria_core::{cpf_check_digits, format_cpf, format_phone};

    /// An 11-digit CPF with correct check digits.
    pub fn arb_valid_cpf() -> impl Strategy<Value = String> {
        "[0-9]{9}"
            .prop_filter("repeated digits are never valid", |base| {
                let first = base.as_bytes()[0];
                !base.bytes().all(|b| b == first)
            })
            .prop_map(|base| {
                let (first, second) = cpf_check_digits(&base).unwrap();
                format!("{}{}{}", base, first, second)
            })
    }

    /// 11-digit mobile number: area code, then `9`, then eight digits.
    pub fn arb_mobile_phone() -> impl Strategy<Value = String> {
        (11u32..=99, "[0-9]{8}").prop_map(|(area, rest)| format!("{}9{}", area, rest))
    }

    /// 10-digit landline number.
    pub fn arb_landline_phone() -> impl Strategy<Value = String> {
        (11u32..=99, "[2-5][0-9]{7}").prop_map(|(area, rest)| format!("{}{}", area, rest))
    }

    pub fn arb_secretariat_id() -> impl Strategy<Value = SecretariatId> {
        "[a-z0-9]{4,12}".prop_map(|raw| SecretariatId::parse(format!("sec-{}", raw)).unwrap())
    }

    /// A teacher form that passes validation, typed the way a user would.
    pub fn arb_teacher_form() -> impl Strategy<Value = TeacherForm> {
        (
            "[A-Z][a-z]{2,15} [A-Z][a-z]{2,15}",
            arb_valid_cpf(),
            "[a-z]{1,12}@[a-z]{2,10}\\.(com|br|org)",
            "[a-zA-Z0-9]{6,30}",
            prop_oneof![arb_mobile_phone(), arb_landline_phone()],
            (1950i32..2005, 1u32..=12, 1u32..=28),
            prop_oneof![Just("M"), Just("F")],
            1u32..5_000,
            prop_oneof![Just("SP"), Just("MS"), Just("rj"), Just("mg")],
        )
            .prop_map(
                |(nome, cpf, email, senha, phone, (year, month, day), sexo, numero, uf)| {
                    TeacherForm {
                        nome,
                        cpf: format_cpf(&cpf),
                        email,
                        senha,
                        telefone: format_phone(&phone),
                        data_nasc: format!("{:04}-{:02}-{:02}", year, month, day),
                        sexo: sexo.to_string(),
                        logradouro: "Rua das Flores".to_string(),
                        bairro: "Centro".to_string(),
                        numero: numero.to_string(),
                        cidade: "Campo Grande".to_string(),
                        uf: uf.to_string(),
                    }
                },
            )
    }

    /// A course form that passes validation.
    pub fn arb_course_form() -> impl Strategy<Value = CourseForm> {
        ("[A-Z][a-z]{2,30}", 1u32..=60).prop_map(|(nome, months)| CourseForm {
            nome,
            duracao: months.to_string(),
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records and forms.

    use super::*;

    pub fn tenant() -> SecretariatId {
        SecretariatId::parse("sec-1").unwrap()
    }

    pub fn other_tenant() -> SecretariatId {
        SecretariatId::parse("sec-2").unwrap()
    }

    pub fn secretariat(tenant: &SecretariatId) -> Secretariat {
        Secretariat {
            nome: "Secretaria Municipal de Educação".to_string(),
            email: "contato@educacao.gov.br".to_string(),
            id_secretaria: tenant.clone(),
        }
    }

    pub fn teacher(id: &str) -> Teacher {
        Teacher {
            id_professor: TeacherId::new(id),
            nome: format!("Professor {}", id),
            email: format!("{}@escola.br", id),
            cpf: "52998224725".to_string(),
            telefone: "11988887777".to_string(),
            situacao: Status::Active,
            logradouro: "Rua das Flores".to_string(),
            bairro: "Centro".to_string(),
            numero: 10,
            cidade: "São Paulo".to_string(),
            uf: "SP".to_string(),
            sexo: Sex::Female,
            data_nasc: "1980-02-29".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn course(id: &str, tenant: &SecretariatId, duracao: u32, situacao: Status) -> Course {
        Course {
            id_curso: CourseId::new(id),
            nome: format!("Curso {}", id),
            duracao,
            id_secretaria: tenant.clone(),
            situacao,
            data_alteracao: "2024-06-10".to_string(),
        }
    }

    /// JSON body for a list endpoint.
    pub fn list_body<T: serde::Serialize>(records: &[T]) -> Value {
        serde_json::to_value(records).unwrap()
    }

    /// The teacher form used in the end-to-end scenario.
    pub fn valid_teacher_form() -> TeacherForm {
        TeacherForm {
            nome: "Maria Oliveira".to_string(),
            cpf: "529.982.247-25".to_string(),
            email: "Maria@Escola.br".to_string(),
            senha: "segredo1".to_string(),
            telefone: "(11) 98888-7777".to_string(),
            data_nasc: "1980-02-29".to_string(),
            sexo: "F".to_string(),
            logradouro: "Av. Brasil".to_string(),
            bairro: "Jardim".to_string(),
            numero: "10".to_string(),
            cidade: "São Paulo".to_string(),
            uf: "sp".to_string(),
        }
    }

    pub fn valid_course_form() -> CourseForm {
        CourseForm {
            nome: "Técnico em Informática".to_string(),
            duracao: "24".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use super::*;
    use proptest::prelude::*;
    use secretaria_core::{is_valid_cpf, is_valid_phone, Validate};

    proptest! {
        #[test]
        fn prop_generated_documents_are_valid(
            cpf in arb_valid_cpf(),
            mobile in arb_mobile_phone(),
            landline in arb_landline_phone(),
        ) {
            prop_assert!(is_valid_cpf(&cpf));
            prop_assert!(is_valid_phone(&mobile));
            prop_assert!(is_valid_phone(&landline));
        }

        #[test]
        fn prop_generated_forms_validate(teacher in arb_teacher_form(), course in arb_course_form()) {
            prop_assert!(teacher.validate().is_ok(), "{:?}", teacher.validate());
            prop_assert!(course.validate().is_ok());
        }
    }

    #[tokio::test]
    async fn test_mock_queue_then_fallback() {
        let mock = MockBackend::new();
        mock.on_json(Method::Get, "/x", serde_json::json!([]))
            .enqueue(Method::Get, "/x", Err(TransportError::Network("down".into())));

        assert!(mock.send(Method::Get, "/x", None).await.is_err());
        assert_eq!(mock.send(Method::Get, "/x", None).await, Ok(serde_json::json!([])));
        assert_eq!(
            mock.send(Method::Delete, "/y", None).await.unwrap_err(),
            TransportError::Status {
                status: 404,
                body: "no mock route for DELETE /y".to_string()
            }
        );
        assert_eq!(mock.calls_to(Method::Get, "/x"), 2);
        assert_eq!(mock.call_count(), 3);
    }
}
