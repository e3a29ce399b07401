//! Form validation
//!
//! One validator per form. Every field is checked and every failure is reported,
//! in field order, so a form can show all inline messages at once. Each field
//! reports at most one message: the first rule it breaks.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::document::{is_valid_cpf, is_valid_phone};
use crate::entities::{CourseForm, CourseUpdate, LoginForm, ResetPasswordForm, TeacherForm, TeacherUpdate};
use crate::enums::Sex;
use crate::error::{FieldError, TransformError, ValidationError};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 50;
pub const DURATION_MIN_MONTHS: u32 = 1;
pub const DURATION_MAX_MONTHS: u32 = 60;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

/// Check an email address against the `local@domain.tld` shape.
pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_PATTERN.is_match(raw.trim())
}

/// Parse a course duration in months, accepting only integers in `1..=60`.
pub fn parse_duration(raw: &str) -> Result<u32, TransformError> {
    let trimmed = raw.trim();
    match parse_unsigned(trimmed) {
        Some(months) if (DURATION_MIN_MONTHS..=DURATION_MAX_MONTHS).contains(&months) => Ok(months),
        _ => Err(TransformError::DurationOutOfRange {
            value: trimmed.to_string(),
        }),
    }
}

/// Parse a street number, accepting only positive integers.
pub fn parse_street_number(raw: &str) -> Result<u32, TransformError> {
    let trimmed = raw.trim();
    match parse_unsigned(trimmed) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(TransformError::InvalidNumber {
            value: trimmed.to_string(),
        }),
    }
}

fn parse_unsigned(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ============================================================================
// VALIDATE TRAIT
// ============================================================================

/// Trait for forms that can be checked before submission.
pub trait Validate {
    /// Check every field. `Err` carries at least one field error.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Trait for checking if an update request has any fields set.
pub trait HasUpdates {
    fn has_any_updates(&self) -> bool;
}

/// Collects one message per failing field.
#[derive(Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn required(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.fail(field, message);
            false
        } else {
            true
        }
    }

    fn name(&mut self, field: &'static str, value: &str) {
        let trimmed = value.trim();
        let chars = trimmed.chars().count();
        if chars == 0 {
            self.fail(field, "Nome é obrigatório");
        } else if chars < NAME_MIN_CHARS {
            self.fail(field, "Nome deve ter pelo menos 2 caracteres");
        } else if chars > NAME_MAX_CHARS {
            self.fail(field, "Nome muito longo");
        }
    }

    fn email(&mut self, value: &str) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.fail("email", "Email é obrigatório");
        } else if !is_valid_email(trimmed) {
            self.fail("email", "Digite um email válido");
        } else if trimmed.chars().count() > EMAIL_MAX_CHARS {
            self.fail("email", "Email muito longo");
        }
    }

    fn password(&mut self, field: &'static str, value: &str) {
        let chars = value.chars().count();
        if chars == 0 {
            self.fail(field, "Senha é obrigatória");
        } else if chars < PASSWORD_MIN_CHARS {
            self.fail(field, "Senha deve ter pelo menos 6 caracteres");
        } else if chars > PASSWORD_MAX_CHARS {
            self.fail(field, "Senha muito longa");
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        match ValidationError::from_fields(self.errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ============================================================================
// FORM VALIDATORS
// ============================================================================

impl Validate for TeacherForm {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::default();

        checks.name("nome", &self.nome);

        if checks.required("cpf", &self.cpf, "CPF é obrigatório") && !is_valid_cpf(&self.cpf) {
            checks.fail("cpf", "CPF inválido");
        }

        checks.email(&self.email);
        checks.password("senha", &self.senha);

        if checks.required("telefone", &self.telefone, "Telefone é obrigatório")
            && !is_valid_phone(&self.telefone)
        {
            checks.fail("telefone", "Telefone inválido");
        }

        if checks.required("data_nasc", &self.data_nasc, "Data de nascimento é obrigatória")
            && NaiveDate::parse_from_str(self.data_nasc.trim(), "%Y-%m-%d").is_err()
        {
            checks.fail("data_nasc", "Data de nascimento inválida");
        }

        if Sex::from_code(&self.sexo).is_err() {
            checks.fail("sexo", "Sexo deve ser M ou F");
        }

        checks.required("logradouro", &self.logradouro, "Logradouro é obrigatório");
        checks.required("bairro", &self.bairro, "Bairro é obrigatório");

        if checks.required("numero", &self.numero, "Número é obrigatório") {
            if let Err(err) = parse_street_number(&self.numero) {
                checks.fail("numero", err.to_string());
            }
        }

        checks.required("cidade", &self.cidade, "Cidade é obrigatória");

        if self.uf.trim().chars().count() != 2 {
            checks.fail("uf", "UF deve ter 2 caracteres");
        }

        checks.finish()
    }
}

impl Validate for CourseForm {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::default();

        checks.name("nome", &self.nome);

        if checks.required("duracao", &self.duracao, "Duração é obrigatória") {
            if let Err(err) = parse_duration(&self.duracao) {
                checks.fail("duracao", err.to_string());
            }
        }

        checks.finish()
    }
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::default();
        checks.email(&self.email);
        checks.password("password", &self.password);
        checks.finish()
    }
}

impl Validate for ResetPasswordForm {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::default();
        checks.email(&self.email);
        checks.password("password", &self.password);

        if checks.required(
            "confirm_password",
            &self.confirm_password,
            "Confirmação de senha é obrigatória",
        ) && self.password != self.confirm_password
        {
            checks.fail("confirm_password", "As senhas não coincidem");
        }

        checks.finish()
    }
}

impl HasUpdates for TeacherUpdate {
    fn has_any_updates(&self) -> bool {
        self.nome.is_some()
            || self.cpf.is_some()
            || self.email.is_some()
            || self.senha.is_some()
            || self.telefone.is_some()
            || self.data_nasc.is_some()
            || self.sexo.is_some()
            || self.logradouro.is_some()
            || self.bairro.is_some()
            || self.numero.is_some()
            || self.cidade.is_some()
            || self.uf.is_some()
            || self.situacao.is_some()
    }
}

impl HasUpdates for CourseUpdate {
    fn has_any_updates(&self) -> bool {
        self.nome.is_some()
            || self.duracao.is_some()
            || self.situacao.is_some()
            || self.data_alteracao.is_some()
    }
}
