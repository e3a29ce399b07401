//! Teacher and course endpoint definitions.

use secretaria_core::{
    Course, CourseDto, CourseId, CourseUpdate, EntityKind, SecretariatId, Teacher, TeacherDto,
    TeacherId, TeacherUpdate,
};

use crate::error::{ErrorMessages, COURSE_MESSAGES, TEACHER_MESSAGES};
use crate::resource::{EntityResource, ResourceSpec};

/// `/professor` endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeacherSpec;

impl ResourceSpec for TeacherSpec {
    type Record = Teacher;
    type Dto = TeacherDto;
    type Update = TeacherUpdate;
    type Id = TeacherId;

    const KIND: EntityKind = EntityKind::Teacher;

    fn messages() -> &'static ErrorMessages {
        &TEACHER_MESSAGES
    }

    fn create_path(tenant: &SecretariatId) -> String {
        format!("/professor/{}", tenant)
    }

    fn list_path(tenant: &SecretariatId) -> String {
        format!("/professor/{}", tenant)
    }

    fn item_path(id: &TeacherId) -> String {
        format!("/professor/{}", id)
    }

    fn dto_tenant(dto: &TeacherDto) -> &SecretariatId {
        &dto.id_secretaria
    }

    fn update_tenant(update: &TeacherUpdate) -> Option<&SecretariatId> {
        update.id_secretaria.as_ref()
    }

    fn record_id(record: &Teacher) -> &TeacherId {
        &record.id_professor
    }
}

/// `/curso` endpoints. Listing lives under `/curso/{id}/secretaria`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CourseSpec;

impl ResourceSpec for CourseSpec {
    type Record = Course;
    type Dto = CourseDto;
    type Update = CourseUpdate;
    type Id = CourseId;

    const KIND: EntityKind = EntityKind::Course;

    fn messages() -> &'static ErrorMessages {
        &COURSE_MESSAGES
    }

    fn create_path(tenant: &SecretariatId) -> String {
        format!("/curso/{}", tenant)
    }

    fn list_path(tenant: &SecretariatId) -> String {
        format!("/curso/{}/secretaria", tenant)
    }

    fn item_path(id: &CourseId) -> String {
        format!("/curso/{}", id)
    }

    fn dto_tenant(dto: &CourseDto) -> &SecretariatId {
        &dto.id_secretaria
    }

    fn update_tenant(update: &CourseUpdate) -> Option<&SecretariatId> {
        update.id_secretaria.as_ref()
    }

    fn record_id(record: &Course) -> &CourseId {
        &record.id_curso
    }
}

pub type TeacherResource = EntityResource<TeacherSpec>;
pub type CourseResource = EntityResource<CourseSpec>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_templates() {
        let tenant = SecretariatId::parse("sec-1").unwrap();
        assert_eq!(TeacherSpec::create_path(&tenant), "/professor/sec-1");
        assert_eq!(TeacherSpec::list_path(&tenant), "/professor/sec-1");
        assert_eq!(TeacherSpec::item_path(&TeacherId::new("p9")), "/professor/p9");
        assert_eq!(CourseSpec::create_path(&tenant), "/curso/sec-1");
        assert_eq!(CourseSpec::list_path(&tenant), "/curso/sec-1/secretaria");
        assert_eq!(CourseSpec::item_path(&CourseId::new("c3")), "/curso/c3");
    }
}
