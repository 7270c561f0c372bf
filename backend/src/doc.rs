//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every HTTP endpoint from the inbound layer, the request
//! and response schemas, and the session-cookie security scheme. The
//! generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{ApplicationStatus, Category, Error, ErrorCode, ExperienceLevel, Role};
use crate::inbound::http::applications::{ApplicationBody, ApplyRequestBody, DecideRequestBody};
use crate::inbound::http::jobs::{CreateJobRequestBody, JobBody};
use crate::inbound::http::users::{
    LoginRequestBody, RegisterRequestBody, UpdateProfileRequestBody, UserBody,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/users/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Job marketplace backend API",
        description = "HTTP interface for posting jobs, applying to them, and \
                       session-authenticated account management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::jobs::list_jobs,
        crate::inbound::http::jobs::my_jobs,
        crate::inbound::http::jobs::job_detail,
        crate::inbound::http::jobs::create_job,
        crate::inbound::http::jobs::close_job,
        crate::inbound::http::applications::apply_to_job,
        crate::inbound::http::applications::my_applications,
        crate::inbound::http::applications::job_applications,
        crate::inbound::http::applications::update_application_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserBody,
        RegisterRequestBody,
        LoginRequestBody,
        UpdateProfileRequestBody,
        JobBody,
        CreateJobRequestBody,
        ApplicationBody,
        ApplyRequestBody,
        DecideRequestBody,
        Error,
        ErrorCode,
        Role,
        Category,
        ExperienceLevel,
        ApplicationStatus,
    )),
    tags(
        (name = "users", description = "Registration, login, and profiles"),
        (name = "jobs", description = "Job postings"),
        (name = "applications", description = "Job applications and decisions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
