//! Application API handlers.
//!
//! ```text
//! POST /api/v1/jobs/{job_id}/applications
//! GET  /api/v1/jobs/{job_id}/applications
//! GET  /api/v1/applications/mine
//! PUT  /api/v1/applications/{application_id}/status
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ApplicationStatus;
use crate::domain::Error;
use crate::domain::ports::{
    ApplicationPayload, ApplicationSubmission, ApplyRequest, DecideApplicationRequest,
    ListJobApplicationsRequest, ListMyApplicationsRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::resolve_caller;
use crate::inbound::http::jobs::JobBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserBody;
use crate::inbound::http::validation::{
    FieldName, parse_decision, parse_optional_decimal,
};

/// Application representation with nested job and freelancer detail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationBody {
    #[schema(format = "uuid")]
    pub id: Uuid,
    pub job: JobBody,
    pub freelancer: UserBody,
    pub cover_letter: String,
    /// Decimal amount rendered as a string, e.g. `"450.00"`.
    pub bid_amount: Option<String>,
    pub status: ApplicationStatus,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<ApplicationPayload> for ApplicationBody {
    fn from(value: ApplicationPayload) -> Self {
        Self {
            id: value.id,
            job: JobBody::from(value.job),
            freelancer: UserBody::from(value.freelancer),
            cover_letter: value.cover_letter,
            bid_amount: value.bid_amount.map(|bid| bid.to_string()),
            status: value.status,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Request payload for applying to a job.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequestBody {
    pub cover_letter: String,
    /// Decimal amount as a string, e.g. `"450.00"`.
    pub bid_amount: Option<String>,
}

/// Request payload for deciding an application.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideRequestBody {
    /// Either `accepted` or `rejected`; `pending` is not a decision.
    pub status: String,
}

/// Apply to an active job as the calling freelancer.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{job_id}/applications",
    params(("job_id" = Uuid, Path, description = "Job identifier")),
    request_body = ApplyRequestBody,
    responses(
        (status = 201, description = "Application submitted", body = ApplicationBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "No active job with this id", body = Error),
        (status = 409, description = "Already applied", body = Error)
    ),
    tags = ["applications"],
    operation_id = "applyToJob",
    security(("SessionCookie" = []))
)]
#[post("/jobs/{job_id}/applications")]
pub async fn apply_to_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<ApplyRequestBody>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_caller(&session, &state).await?;
    let body = payload.into_inner();
    let submission = ApplicationSubmission {
        cover_letter: body.cover_letter,
        bid_amount: parse_optional_decimal(body.bid_amount, FieldName::new("bidAmount"))?,
    };

    let response = state
        .applications
        .apply(ApplyRequest {
            caller,
            job_id: path.into_inner(),
            submission,
        })
        .await?;
    Ok(HttpResponse::Created().json(ApplicationBody::from(response.application)))
}

/// List the calling freelancer's applications with job detail.
#[utoipa::path(
    get,
    path = "/api/v1/applications/mine",
    responses(
        (status = 200, description = "Applications by the caller", body = [ApplicationBody]),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["applications"],
    operation_id = "listMyApplications",
    security(("SessionCookie" = []))
)]
#[get("/applications/mine")]
pub async fn my_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ApplicationBody>>> {
    let caller = resolve_caller(&session, &state).await?;
    let response = state
        .applications_query
        .list_my_applications(ListMyApplicationsRequest { caller })
        .await?;
    Ok(web::Json(
        response
            .applications
            .into_iter()
            .map(ApplicationBody::from)
            .collect(),
    ))
}

/// List every application for one of the caller's jobs.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{job_id}/applications",
    params(("job_id" = Uuid, Path, description = "Job identifier")),
    responses(
        (status = 200, description = "Applications for the job", body = [ApplicationBody]),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Not the caller's job", body = Error)
    ),
    tags = ["applications"],
    operation_id = "listJobApplications",
    security(("SessionCookie" = []))
)]
#[get("/jobs/{job_id}/applications")]
pub async fn job_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<ApplicationBody>>> {
    let caller = resolve_caller(&session, &state).await?;
    let response = state
        .applications_query
        .list_job_applications(ListJobApplicationsRequest {
            caller,
            job_id: path.into_inner(),
        })
        .await?;
    Ok(web::Json(
        response
            .applications
            .into_iter()
            .map(ApplicationBody::from)
            .collect(),
    ))
}

/// Accept or reject a pending application as the job's owning client.
#[utoipa::path(
    put,
    path = "/api/v1/applications/{application_id}/status",
    params(("application_id" = Uuid, Path, description = "Application identifier")),
    request_body = DecideRequestBody,
    responses(
        (status = 200, description = "Updated application", body = ApplicationBody),
        (status = 400, description = "Invalid status value", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the owning client", body = Error),
        (status = 404, description = "Unknown application", body = Error),
        (status = 409, description = "Application already resolved", body = Error)
    ),
    tags = ["applications"],
    operation_id = "updateApplicationStatus",
    security(("SessionCookie" = []))
)]
#[put("/applications/{application_id}/status")]
pub async fn update_application_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<DecideRequestBody>,
) -> ApiResult<web::Json<ApplicationBody>> {
    let caller = resolve_caller(&session, &state).await?;
    let decision = parse_decision(&payload.into_inner().status, FieldName::new("status"))?;

    let response = state
        .applications
        .decide_application(DecideApplicationRequest {
            caller,
            application_id: path.into_inner(),
            decision,
        })
        .await?;
    Ok(web::Json(ApplicationBody::from(response.application)))
}

#[cfg(test)]
#[path = "applications_tests.rs"]
mod tests;
