//! Job API handlers.
//!
//! ```text
//! GET  /api/v1/jobs?category=design
//! GET  /api/v1/jobs/mine
//! GET  /api/v1/jobs/{job_id}
//! POST /api/v1/jobs
//! POST /api/v1/jobs/{job_id}/close
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    CloseJobRequest, CreateJobRequest, GetJobRequest, JobPayload, JobSubmission, ListJobsRequest,
    ListMyJobsRequest,
};
use crate::domain::{Category, Error, ExperienceLevel};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::resolve_caller;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserBody;
use crate::inbound::http::validation::{
    FieldName, parse_category, parse_optional_decimal, parse_optional_experience_level,
    parse_optional_rfc3339_timestamp,
};

/// Job representation returned by listing, detail, and mutation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobBody {
    #[schema(format = "uuid")]
    pub id: Uuid,
    pub client: UserBody,
    pub title: String,
    pub description: String,
    pub category: Category,
    /// Decimal amount rendered as a string, e.g. `"1500.00"`.
    pub budget: Option<String>,
    pub is_fixed_price: bool,
    pub experience_level: ExperienceLevel,
    #[schema(format = "date-time")]
    pub deadline: Option<String>,
    pub is_active: bool,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<JobPayload> for JobBody {
    fn from(value: JobPayload) -> Self {
        Self {
            id: value.id,
            client: UserBody::from(value.client),
            title: value.title,
            description: value.description,
            category: value.category,
            budget: value.budget.map(|budget| budget.to_string()),
            is_fixed_price: value.is_fixed_price,
            experience_level: value.experience_level,
            deadline: value.deadline.map(|deadline| deadline.to_rfc3339()),
            is_active: value.is_active,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Request payload for creating a job.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequestBody {
    pub title: String,
    pub description: String,
    pub category: String,
    /// Decimal amount as a string, e.g. `"1500.00"`.
    pub budget: Option<String>,
    /// Defaults to fixed-price when absent.
    pub is_fixed_price: Option<bool>,
    /// Defaults to `entry` when absent.
    pub experience_level: Option<String>,
    #[schema(format = "date-time")]
    pub deadline: Option<String>,
}

/// Category filter for the public listing. An unrecognized value is a
/// validation error, not a silent no-filter.
#[derive(Debug, Deserialize)]
pub struct ListJobsParams {
    pub category: Option<String>,
}

fn parse_submission(body: CreateJobRequestBody) -> Result<JobSubmission, Error> {
    Ok(JobSubmission {
        title: body.title,
        description: body.description,
        category: parse_category(&body.category, FieldName::new("category"))?,
        budget: parse_optional_decimal(body.budget, FieldName::new("budget"))?,
        is_fixed_price: body.is_fixed_price.unwrap_or(true),
        experience_level: parse_optional_experience_level(
            body.experience_level,
            FieldName::new("experienceLevel"),
        )?,
        deadline: parse_optional_rfc3339_timestamp(body.deadline, FieldName::new("deadline"))?,
    })
}

/// List active jobs, newest first. Public.
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    params(("category" = Option<String>, Query, description = "Restrict to one category")),
    responses(
        (status = 200, description = "Active jobs", body = [JobBody]),
        (status = 400, description = "Unknown category", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "listJobs",
    security([])
)]
#[get("/jobs")]
pub async fn list_jobs(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<ListJobsParams>,
) -> ApiResult<web::Json<Vec<JobBody>>> {
    let caller = resolve_caller(&session, &state).await?;
    let category = params
        .into_inner()
        .category
        .map(|raw| parse_category(&raw, FieldName::new("category")))
        .transpose()?;

    let response = state
        .jobs_query
        .list_jobs(ListJobsRequest { caller, category })
        .await?;
    Ok(web::Json(
        response.jobs.into_iter().map(JobBody::from).collect(),
    ))
}

/// List the calling client's own jobs, active or not.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/mine",
    responses(
        (status = 200, description = "Jobs owned by the caller", body = [JobBody]),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "listMyJobs",
    security(("SessionCookie" = []))
)]
#[get("/jobs/mine")]
pub async fn my_jobs(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<JobBody>>> {
    let caller = resolve_caller(&session, &state).await?;
    let response = state
        .jobs_query
        .list_my_jobs(ListMyJobsRequest { caller })
        .await?;
    Ok(web::Json(
        response.jobs.into_iter().map(JobBody::from).collect(),
    ))
}

/// Fetch one active job. Public; inactive jobs are hidden.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{job_id}",
    params(("job_id" = Uuid, Path, description = "Job identifier")),
    responses(
        (status = 200, description = "Job detail", body = JobBody),
        (status = 404, description = "No active job with this id", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "getJob",
    security([])
)]
#[get("/jobs/{job_id}")]
pub async fn job_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<JobBody>> {
    let caller = resolve_caller(&session, &state).await?;
    let response = state
        .jobs_query
        .get_job(GetJobRequest {
            caller,
            job_id: path.into_inner(),
        })
        .await?;
    Ok(web::Json(JobBody::from(response.job)))
}

/// Post a new job as the calling client.
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = CreateJobRequestBody,
    responses(
        (status = 201, description = "Job created", body = JobBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "createJob",
    security(("SessionCookie" = []))
)]
#[post("/jobs")]
pub async fn create_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateJobRequestBody>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_caller(&session, &state).await?;
    let submission = parse_submission(payload.into_inner())?;

    let response = state
        .jobs
        .create_job(CreateJobRequest { caller, submission })
        .await?;
    Ok(HttpResponse::Created().json(JobBody::from(response.job)))
}

/// Take a job off the public listing.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{job_id}/close",
    params(("job_id" = Uuid, Path, description = "Job identifier")),
    responses(
        (status = 200, description = "Job closed", body = JobBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not the caller's job", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "closeJob",
    security(("SessionCookie" = []))
)]
#[post("/jobs/{job_id}/close")]
pub async fn close_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<JobBody>> {
    let caller = resolve_caller(&session, &state).await?;
    let response = state
        .jobs
        .close_job(CloseJobRequest {
            caller,
            job_id: path.into_inner(),
        })
        .await?;
    Ok(web::Json(JobBody::from(response.job)))
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
