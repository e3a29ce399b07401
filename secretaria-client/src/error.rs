//! Client error taxonomy and backend error mapping.
//!
//! Every variant displays as the exact message a user should see, so controllers
//! can store `err.to_string()` as their error state.

use serde_json::Value;
use tracing::warn;

use secretaria_core::{SecretariaError, SessionError, TransformError, ValidationError};

use crate::transport::TransportError;

/// Errors surfaced by resources and controllers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// 400 whose body names an already registered entity.
    #[error("{message}")]
    Duplicate { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    /// Any other non-2xx answer, carrying the backend's own message.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("Resposta inválida do servidor: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Missing or invalid tenant id.
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Operação cancelada")]
    Cancelled,

    #[error("Nenhuma alteração informada")]
    EmptyUpdate,

    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro ao acessar armazenamento local: {0}")]
    Storage(String),
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// The message held in controller state.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status when the error came from a backend answer.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Duplicate { .. } => Some(400),
            ClientError::NotFound { .. } => Some(404),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

impl From<SecretariaError> for ClientError {
    fn from(err: SecretariaError) -> Self {
        match err {
            SecretariaError::Validation(e) => ClientError::Validation(e),
            SecretariaError::Transform(e) => ClientError::Transform(e),
            SecretariaError::Session(e) => ClientError::Session(e),
            SecretariaError::Config(e) => ClientError::Config(e.to_string()),
        }
    }
}

/// Phrase that marks a 400 as a duplicate, and the message shown instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateRule {
    pub phrase: &'static str,
    pub message: &'static str,
}

/// Per-entity user-facing messages for well-known backend answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorMessages {
    pub duplicate: Option<DuplicateRule>,
    pub not_found: &'static str,
    pub forbidden: &'static str,
}

pub const TEACHER_MESSAGES: ErrorMessages = ErrorMessages {
    duplicate: Some(DuplicateRule {
        phrase: "já cadastrado",
        message: "Este professor já está cadastrado no sistema.",
    }),
    not_found: "Nenhum professor encontrado para esta secretaria.",
    forbidden: "Sem permissão para acessar professores desta secretaria.",
};

pub const COURSE_MESSAGES: ErrorMessages = ErrorMessages {
    duplicate: Some(DuplicateRule {
        phrase: "já cadastrado",
        message: "Este curso já está cadastrado no sistema.",
    }),
    not_found: "Nenhum curso encontrado.",
    forbidden: "Sem permissão para visualizar cursos.",
};

pub const SECRETARIAT_MESSAGES: ErrorMessages = ErrorMessages {
    duplicate: None,
    not_found: "Secretaria não encontrada.",
    forbidden: "Sem permissão para acessar os dados desta secretaria.",
};

/// Pull a human message out of an error body.
///
/// JSON string bodies and `message`/`error` fields win; otherwise the raw text;
/// an empty body falls back to `Erro HTTP {status}`.
pub fn backend_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        match &value {
            Value::String(s) if !s.trim().is_empty() => return s.clone(),
            Value::Object(map) => {
                for field in ["message", "error"] {
                    if let Some(Value::String(s)) = map.get(field) {
                        if !s.trim().is_empty() {
                            return s.clone();
                        }
                    }
                }
            }
            _ => {}
        }
    }
    if trimmed.is_empty() {
        format!("Erro HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

/// Map a transport failure to the entity's user-facing error.
pub fn map_transport_error(err: TransportError, messages: &ErrorMessages) -> ClientError {
    let mapped = match err {
        TransportError::Status { status: 400, body } => match messages.duplicate {
            Some(rule) if body.to_lowercase().contains(rule.phrase) => ClientError::Duplicate {
                message: rule.message.to_string(),
            },
            _ => ClientError::Backend {
                status: 400,
                message: backend_message(400, &body),
            },
        },
        TransportError::Status { status: 404, .. } => ClientError::NotFound {
            message: messages.not_found.to_string(),
        },
        TransportError::Status { status: 403, .. } => ClientError::Forbidden {
            message: messages.forbidden.to_string(),
        },
        TransportError::Status { status, body } => ClientError::Backend {
            status,
            message: backend_message(status, &body),
        },
        TransportError::Network(message) => ClientError::Transport(message),
        TransportError::Decode(message) => ClientError::Decode(message),
    };
    warn!(status = ?mapped.status(), error = %mapped, "backend request failed");
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, body: &str) -> TransportError {
        TransportError::Status {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_duplicate_phrase_in_plain_body() {
        let err = map_transport_error(status(400, "Professor já cadastrado"), &TEACHER_MESSAGES);
        assert_eq!(err.user_message(), "Este professor já está cadastrado no sistema.");
    }

    #[test]
    fn test_duplicate_phrase_in_json_body() {
        let err = map_transport_error(
            status(400, r#"{"message":"Curso já cadastrado para esta secretaria"}"#),
            &COURSE_MESSAGES,
        );
        assert_eq!(err.user_message(), "Este curso já está cadastrado no sistema.");
    }

    #[test]
    fn test_duplicate_phrase_on_any_field() {
        for body in [
            "CPF já cadastrado",
            "Email já cadastrado no sistema",
            r#"{"message":"Registro JÁ CADASTRADO"}"#,
        ] {
            assert_eq!(
                map_transport_error(status(400, body), &TEACHER_MESSAGES).user_message(),
                "Este professor já está cadastrado no sistema."
            );
            assert_eq!(
                map_transport_error(status(400, body), &COURSE_MESSAGES).user_message(),
                "Este curso já está cadastrado no sistema."
            );
        }
    }

    #[test]
    fn test_other_400_passes_backend_message() {
        let err = map_transport_error(status(400, r#"{"error":"CPF ausente"}"#), &TEACHER_MESSAGES);
        assert_eq!(
            err,
            ClientError::Backend {
                status: 400,
                message: "CPF ausente".to_string()
            }
        );
    }

    #[test]
    fn test_not_found_and_forbidden() {
        assert_eq!(
            map_transport_error(status(404, ""), &TEACHER_MESSAGES).user_message(),
            "Nenhum professor encontrado para esta secretaria."
        );
        assert_eq!(
            map_transport_error(status(403, "nope"), &COURSE_MESSAGES).user_message(),
            "Sem permissão para visualizar cursos."
        );
    }

    #[test]
    fn test_fallback_messages() {
        assert_eq!(backend_message(500, ""), "Erro HTTP 500");
        assert_eq!(backend_message(502, "Bad gateway"), "Bad gateway");
        assert_eq!(backend_message(500, "\"falhou\""), "falhou");
        assert_eq!(
            map_transport_error(TransportError::Network("connection refused".into()), &COURSE_MESSAGES)
                .user_message(),
            "connection refused"
        );
    }

    #[test]
    fn test_domain_errors_keep_their_message() {
        let err: ClientError = SecretariaError::Transform(TransformError::InvalidSex {
            value: "X".to_string(),
        })
        .into();
        assert_eq!(err, ClientError::Transform(TransformError::InvalidSex { value: "X".to_string() }));
        assert_eq!(err.user_message(), "Sexo deve ser M ou F");
    }

    #[test]
    fn test_session_message_passthrough() {
        let err: ClientError = SessionError::MissingTenant.into();
        assert_eq!(err.user_message(), "Sessão inválida. Por favor, faça login novamente.");
    }
}
