//! Secretaria Client
//!
//! REST access to the school secretariat backend, behind a shared TTL cache:
//!
//! - [`EntityResource`] gives create/list/update/delete per entity kind
//! - [`TenantResolver`] finds the owning secretariat id
//! - [`FormController`] and [`ListController`] hold the state a screen renders
//!
//! Every failure ends up as a user-facing message via [`ClientError::user_message`].

pub mod async_state;
pub mod cancel;
pub mod config;
pub mod error;
pub mod form;
pub mod list;
pub mod loading;
pub mod resource;
pub mod resources;
pub mod rest;
pub mod secretariat;
pub mod session;
pub mod transport;

pub use async_state::{AsyncState, Pagination, DEFAULT_PAGE_SIZE};
pub use cancel::CancelToken;
pub use config::{
    config_path_from_args, CacheSection, ClientConfig, ConfigLoadError, LogFormat, SessionSection,
    CONFIG_PATH_ENV, SESSION_TOKEN_ENV,
};
pub use error::{
    backend_message, map_transport_error, ClientError, ClientResult, DuplicateRule, ErrorMessages,
    COURSE_MESSAGES, SECRETARIAT_MESSAGES, TEACHER_MESSAGES,
};
pub use form::{
    CourseFormBinding, CourseFormController, FormBinding, FormController, FormMode,
    TeacherFormBinding, TeacherFormController,
};
pub use list::{CourseList, ListController, TeacherList};
pub use loading::{LoadingFlag, LoadingGuard};
pub use resource::{EntityResource, ResourceSpec};
pub use resources::{CourseResource, CourseSpec, TeacherResource, TeacherSpec};
pub use rest::RestClient;
pub use secretariat::{profile_path, SecretariatProfile};
pub use session::{
    cookie_value, decode_claims, SessionStore, SessionUserSource, StoredTenantSource,
    TenantResolver, TenantSource, TokenClaimsSource, TENANT_STORAGE_KEY,
};
pub use transport::{Backend, Method, TransportError};
