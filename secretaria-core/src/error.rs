//! Error types for secretariat operations

use std::fmt;
use thiserror::Error;

/// Message shown when no tenant id can be resolved from the session.
pub const SESSION_INVALID_MESSAGE: &str = "Sessão inválida. Por favor, faça login novamente.";

/// A single failed field rule, carrying the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validation errors for a whole form, in field order.
///
/// Never empty: a form that passes every rule yields `Ok(())` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// Build from collected field errors. Returns `None` when there are none.
    pub fn from_fields(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message recorded for `field`, for inline display next to an input.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

/// Form-to-DTO transformation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("Número deve ser um valor válido maior que zero")]
    InvalidNumber { value: String },

    #[error("Duração deve ser um número entre 1 e 60 meses")]
    DurationOutOfRange { value: String },

    #[error("Sexo deve ser M ou F")]
    InvalidSex { value: String },
}

/// Session and tenant identity errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{}", SESSION_INVALID_MESSAGE)]
    MissingTenant,

    #[error("ID da secretaria é obrigatório")]
    InvalidTenant { value: String },
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Master error type for the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretariaError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for domain operations.
pub type SecretariaResult<T> = Result<T, SecretariaError>;
