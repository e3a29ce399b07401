//! Form shapes, wire DTOs and server records.
//!
//! Field names follow the backend's Portuguese wire format; the Rust side keeps
//! them verbatim on form and record types so serde needs no renames except where
//! the wire uses upper-case keys (`CPF`, `UF`).

use serde::{Deserialize, Serialize};

use crate::enums::{Sex, Status};
use crate::identity::{CourseId, SecretariatId, TeacherId};

// ============================================================================
// FORMS (user input, everything is text)
// ============================================================================

/// Teacher registration form as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeacherForm {
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub senha: String,
    pub telefone: String,
    pub data_nasc: String,
    pub sexo: String,
    pub logradouro: String,
    pub bairro: String,
    pub numero: String,
    pub cidade: String,
    pub uf: String,
}

impl Default for TeacherForm {
    fn default() -> Self {
        Self {
            nome: String::new(),
            cpf: String::new(),
            email: String::new(),
            senha: String::new(),
            telefone: String::new(),
            data_nasc: String::new(),
            sexo: Sex::Male.as_code().to_string(),
            logradouro: String::new(),
            bairro: String::new(),
            numero: String::new(),
            cidade: String::new(),
            uf: String::new(),
        }
    }
}

/// Course registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseForm {
    pub nome: String,
    pub duracao: String,
}

/// Login form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Password reset form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetPasswordForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

// ============================================================================
// WIRE DTOS
// ============================================================================

/// Teacher payload for `POST /professor/{secretariaId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherDto {
    pub nome: String,
    #[serde(rename = "CPF")]
    pub cpf: String,
    pub email: String,
    pub senha: String,
    pub telefone: String,
    pub data_nasc: String,
    pub sexo: Sex,
    pub logradouro: String,
    pub bairro: String,
    pub numero: u32,
    pub cidade: String,
    #[serde(rename = "UF")]
    pub uf: String,
    pub situacao: Status,
    pub id_secretaria: SecretariatId,
}

/// Course payload for `POST /curso/{secretariaId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDto {
    pub nome: String,
    pub duracao: u32,
    pub id_secretaria: SecretariatId,
    pub situacao: Status,
    /// Client-stamped `YYYY-MM-DD`, not server-authoritative.
    pub data_alteracao: String,
}

/// Partial teacher update for `PUT /professor/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(rename = "CPF", skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_nasc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexo: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logradouro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bairro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidade: Option<String>,
    #[serde(rename = "UF", skip_serializing_if = "Option::is_none")]
    pub uf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situacao: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_secretaria: Option<SecretariatId>,
}

impl From<TeacherDto> for TeacherUpdate {
    fn from(dto: TeacherDto) -> Self {
        Self {
            nome: Some(dto.nome),
            cpf: Some(dto.cpf),
            email: Some(dto.email),
            senha: Some(dto.senha),
            telefone: Some(dto.telefone),
            data_nasc: Some(dto.data_nasc),
            sexo: Some(dto.sexo),
            logradouro: Some(dto.logradouro),
            bairro: Some(dto.bairro),
            numero: Some(dto.numero),
            cidade: Some(dto.cidade),
            uf: Some(dto.uf),
            situacao: Some(dto.situacao),
            id_secretaria: Some(dto.id_secretaria),
        }
    }
}

/// Partial course update for `PUT /curso/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duracao: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situacao: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_alteracao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_secretaria: Option<SecretariatId>,
}

impl From<CourseDto> for CourseUpdate {
    fn from(dto: CourseDto) -> Self {
        Self {
            nome: Some(dto.nome),
            duracao: Some(dto.duracao),
            situacao: Some(dto.situacao),
            data_alteracao: Some(dto.data_alteracao),
            id_secretaria: Some(dto.id_secretaria),
        }
    }
}

// ============================================================================
// SERVER RECORDS
// ============================================================================

/// Teacher as returned by `GET /professor/{secretariaId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id_professor: TeacherId,
    pub nome: String,
    pub email: String,
    #[serde(alias = "CPF")]
    pub cpf: String,
    pub telefone: String,
    pub situacao: Status,
    pub logradouro: String,
    pub bairro: String,
    pub numero: u32,
    pub cidade: String,
    #[serde(alias = "UF")]
    pub uf: String,
    pub sexo: Sex,
    pub data_nasc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Course as returned by `GET /curso/{secretariaId}/secretaria`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id_curso: CourseId,
    pub nome: String,
    pub duracao: u32,
    pub id_secretaria: SecretariatId,
    pub situacao: Status,
    pub data_alteracao: String,
}

/// Secretariat (tenant) profile as returned by `GET /secretaria/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secretariat {
    pub nome: String,
    pub email: String,
    pub id_secretaria: SecretariatId,
}
