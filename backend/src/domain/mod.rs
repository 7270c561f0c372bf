//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed core of the marketplace — users, jobs,
//! applications — together with the ports the adapters implement and the
//! services that enforce authorization and lifecycle rules. Keep entities
//! immutable where possible and document invariants in each type's Rustdoc.

pub mod application;
mod application_service;
pub mod auth;
pub mod caller;
pub mod error;
mod identity_service;
pub mod job;
mod job_service;
pub mod ports;
pub mod user;

pub use self::application::{
    AlreadyResolved, ApplicationDecision, ApplicationDetail, ApplicationStatus,
    ApplicationValidationError, COVER_LETTER_MIN, Decided, JobApplication, JobApplicationDraft,
};
pub use self::application_service::{ApplicationCommandService, ApplicationQueryService};
pub use self::auth::{
    LoginCredentials, LoginValidationError, ProfileChanges, RegistrationDraft,
    RegistrationValidationError,
};
pub use self::caller::{AuthenticatedUser, Caller};
pub use self::error::{Error, ErrorCode};
pub use self::identity_service::IdentityService;
pub use self::job::{
    Category, DESCRIPTION_MIN, ExperienceLevel, Job, JobDraft, JobValidationError, JobWithClient,
    TITLE_MAX, TITLE_MIN,
};
pub use self::job_service::{JobCommandService, JobQueryService};
pub use self::user::{
    BIO_MAX, Bio, EMAIL_MAX, Email, Role, USERNAME_MAX, USERNAME_MIN, User, UserId,
    UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
