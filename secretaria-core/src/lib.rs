//! Secretaria Core - Domain Types
//!
//! Identifiers, entities, validation and form transformation for the school
//! secretariat client. No I/O lives here; every other crate depends on this one.

pub mod clock;
pub mod document;
pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod stats;
pub mod transform;
pub mod validation;

pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use document::{cpf_check_digits, digits_only, format_cpf, format_phone, is_valid_cpf, is_valid_phone};
pub use entities::{
    Course, CourseDto, CourseForm, CourseUpdate, LoginForm, ResetPasswordForm, Secretariat, Teacher,
    TeacherDto, TeacherForm, TeacherUpdate,
};
pub use enums::{EntityKind, EnumParseError, Sex, Status};
pub use error::{
    ConfigError, FieldError, SecretariaError, SecretariaResult, SessionError, TransformError,
    ValidationError, SESSION_INVALID_MESSAGE,
};
pub use identity::{CourseId, SecretariatId, TeacherId, Timestamp};
pub use stats::CourseStats;
pub use transform::{course_form_to_dto, prepare_course, prepare_teacher, teacher_form_to_dto};
pub use validation::{is_valid_email, parse_duration, parse_street_number, HasUpdates, Validate};
