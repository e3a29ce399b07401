//! Form → DTO transformation
//!
//! Pure functions: inputs are borrowed, never modified, and numeric fields fail
//! fast instead of being coerced.

use crate::clock::Clock;
use crate::document::digits_only;
use crate::entities::{CourseDto, CourseForm, TeacherDto, TeacherForm};
use crate::enums::{Sex, Status};
use crate::error::{SecretariaResult, TransformError};
use crate::identity::SecretariatId;
use crate::validation::{parse_duration, parse_street_number, Validate};

/// Date format stamped into `data_alteracao`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Map a teacher form to its wire shape.
pub fn teacher_form_to_dto(
    form: &TeacherForm,
    tenant: &SecretariatId,
) -> Result<TeacherDto, TransformError> {
    let numero = parse_street_number(&form.numero)?;
    let sexo =
        Sex::from_code(&form.sexo).map_err(|e| TransformError::InvalidSex { value: e.value })?;

    Ok(TeacherDto {
        nome: form.nome.trim().to_string(),
        cpf: digits_only(&form.cpf),
        email: form.email.trim().to_lowercase(),
        senha: form.senha.clone(),
        telefone: digits_only(&form.telefone),
        data_nasc: form.data_nasc.trim().to_string(),
        sexo,
        logradouro: form.logradouro.trim().to_string(),
        bairro: form.bairro.trim().to_string(),
        numero,
        cidade: form.cidade.trim().to_string(),
        uf: form.uf.trim().to_uppercase(),
        situacao: Status::Active,
        id_secretaria: tenant.clone(),
    })
}

/// Map a course form to its wire shape, stamping today's date from `clock`.
pub fn course_form_to_dto(
    form: &CourseForm,
    tenant: &SecretariatId,
    clock: &dyn Clock,
) -> Result<CourseDto, TransformError> {
    let duracao = parse_duration(&form.duracao)?;

    Ok(CourseDto {
        nome: form.nome.trim().to_string(),
        duracao,
        id_secretaria: tenant.clone(),
        situacao: Status::Active,
        data_alteracao: clock.now().format(DATE_FORMAT).to_string(),
    })
}

/// Validate a teacher form, then map it.
pub fn prepare_teacher(form: &TeacherForm, tenant: &SecretariatId) -> SecretariaResult<TeacherDto> {
    form.validate()?;
    Ok(teacher_form_to_dto(form, tenant)?)
}

/// Validate a course form, then map it.
pub fn prepare_course(
    form: &CourseForm,
    tenant: &SecretariatId,
    clock: &dyn Clock,
) -> SecretariaResult<CourseDto> {
    form.validate()?;
    Ok(course_form_to_dto(form, tenant, clock)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::SecretariaError;

    fn form() -> TeacherForm {
        TeacherForm {
            nome: "  Ana Souza ".to_string(),
            cpf: "529.982.247-25".to_string(),
            email: " Ana@Escola.BR ".to_string(),
            senha: "segredo1".to_string(),
            telefone: "(11) 98888-7777".to_string(),
            data_nasc: "1990-05-17".to_string(),
            sexo: "f".to_string(),
            logradouro: " Rua das Flores ".to_string(),
            bairro: "Centro".to_string(),
            numero: "10".to_string(),
            cidade: "Campo Grande ".to_string(),
            uf: "ms".to_string(),
        }
    }

    #[test]
    fn test_teacher_dto_normalises_fields() {
        let tenant = SecretariatId::parse("sec-1").unwrap();
        let dto = teacher_form_to_dto(&form(), &tenant).unwrap();
        assert_eq!(dto.nome, "Ana Souza");
        assert_eq!(dto.cpf, "52998224725");
        assert_eq!(dto.email, "ana@escola.br");
        assert_eq!(dto.telefone, "11988887777");
        assert_eq!(dto.sexo, Sex::Female);
        assert_eq!(dto.numero, 10);
        assert_eq!(dto.uf, "MS");
        assert_eq!(dto.situacao, Status::Active);
        assert_eq!(dto.id_secretaria, tenant);
    }

    #[test]
    fn test_teacher_dto_rejects_bad_number() {
        let tenant = SecretariatId::parse("sec-1").unwrap();
        for bad in ["0", "-1", "abc", ""] {
            let input = TeacherForm {
                numero: bad.to_string(),
                ..form()
            };
            let err = teacher_form_to_dto(&input, &tenant).unwrap_err();
            assert_eq!(err.to_string(), "Número deve ser um valor válido maior que zero");
        }
    }

    #[test]
    fn test_teacher_dto_rejects_unknown_sex() {
        let tenant = SecretariatId::parse("sec-1").unwrap();
        let input = TeacherForm {
            sexo: "X".to_string(),
            ..form()
        };
        assert_eq!(
            teacher_form_to_dto(&input, &tenant),
            Err(TransformError::InvalidSex {
                value: "X".to_string()
            })
        );
    }

    #[test]
    fn test_course_dto_stamps_date() {
        let tenant = SecretariatId::parse("sec-1").unwrap();
        let clock = FixedClock::from_epoch_secs(1_718_000_000);
        let input = CourseForm {
            nome: " Informática ".to_string(),
            duracao: "24".to_string(),
        };
        let dto = course_form_to_dto(&input, &tenant, &clock).unwrap();
        assert_eq!(dto.nome, "Informática");
        assert_eq!(dto.duracao, 24);
        assert_eq!(dto.data_alteracao, "2024-06-10");
        assert_eq!(input.nome, " Informática ");
    }

    #[test]
    fn test_prepare_reports_validation_before_transform() {
        let tenant = SecretariatId::parse("sec-1").unwrap();
        let input = TeacherForm {
            nome: String::new(),
            numero: "abc".to_string(),
            ..form()
        };
        let err = prepare_teacher(&input, &tenant).unwrap_err();
        assert!(matches!(err, SecretariaError::Validation(ref v) if v.has_field("nome")));

        let clock = FixedClock::from_epoch_secs(0);
        let course = CourseForm {
            nome: "Informática".to_string(),
            duracao: "12".to_string(),
        };
        assert_eq!(prepare_course(&course, &tenant, &clock).unwrap().duracao, 12);
    }

    #[test]
    fn test_course_dto_rejects_out_of_range() {
        let tenant = SecretariatId::parse("sec-1").unwrap();
        let clock = FixedClock::from_epoch_secs(0);
        let input = CourseForm {
            nome: "Informática".to_string(),
            duracao: "61".to_string(),
        };
        assert!(matches!(
            course_form_to_dto(&input, &tenant, &clock),
            Err(TransformError::DurationOutOfRange { .. })
        ));
    }
}
