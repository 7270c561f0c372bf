//! Application workflow domain services.
//!
//! These services implement the application driving ports: submission,
//! decision, and the two listings. Duplicate submissions are never
//! pre-checked here; the repository surfaces the unique-constraint
//! violation and this layer translates it to a conflict.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{
    ApplicationCommand, ApplicationPayload, ApplicationQuery, ApplicationRepository,
    ApplicationRepositoryError, ApplyRequest, ApplyResponse, DecideApplicationRequest,
    DecideApplicationResponse, JobRepository, JobRepositoryError, ListJobApplicationsRequest,
    ListJobApplicationsResponse, ListMyApplicationsRequest, ListMyApplicationsResponse,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    ApplicationDetail, ApplicationStatus, Decided, Error, JobApplication, JobApplicationDraft,
    Role,
};

fn map_job_repository_error(error: JobRepositoryError) -> Error {
    match error {
        JobRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("job repository unavailable: {message}"))
        }
        JobRepositoryError::Query { message } => {
            Error::internal(format!("job repository error: {message}"))
        }
    }
}

fn map_application_repository_error(error: ApplicationRepositoryError) -> Error {
    match error {
        ApplicationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("application repository unavailable: {message}"))
        }
        ApplicationRepositoryError::Query { message } => {
            Error::internal(format!("application repository error: {message}"))
        }
        ApplicationRepositoryError::Duplicate { .. } => {
            Error::conflict("you have already applied to this job")
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message }
        | UserPersistenceError::DuplicateUsername { message }
        | UserPersistenceError::DuplicateEmail { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn job_not_found(job_id: Uuid) -> Error {
    Error::not_found(format!("job {job_id} not found"))
}

/// Application service implementing the command driving port.
#[derive(Clone)]
pub struct ApplicationCommandService<J, A, U> {
    jobs: Arc<J>,
    applications: Arc<A>,
    users: Arc<U>,
}

impl<J, A, U> ApplicationCommandService<J, A, U> {
    /// Create a new command service over the involved repositories.
    pub fn new(jobs: Arc<J>, applications: Arc<A>, users: Arc<U>) -> Self {
        Self {
            jobs,
            applications,
            users,
        }
    }
}

#[async_trait]
impl<J, A, U> ApplicationCommand for ApplicationCommandService<J, A, U>
where
    J: JobRepository,
    A: ApplicationRepository,
    U: UserRepository,
{
    async fn apply(&self, request: ApplyRequest) -> Result<ApplyResponse, Error> {
        let user = *request
            .caller
            .require_role(Role::Freelancer, "only freelancers can apply to jobs")?;

        let job = self
            .jobs
            .find_active_with_client(request.job_id)
            .await
            .map_err(map_job_repository_error)?
            .ok_or_else(|| job_not_found(request.job_id))?;

        let now = Utc::now();
        let submission = request.submission;
        let application = JobApplication::new(JobApplicationDraft {
            id: Uuid::new_v4(),
            job_id: job.job.id(),
            freelancer_id: user.id,
            cover_letter: submission.cover_letter,
            bid_amount: submission.bid_amount,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.applications
            .insert(&application)
            .await
            .map_err(map_application_repository_error)?;

        let freelancer = self
            .users
            .find_by_id(&user.id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::internal(format!("freelancer account {} missing", user.id)))?;

        Ok(ApplyResponse {
            application: ApplicationPayload::from(ApplicationDetail {
                application,
                job: job.job,
                client: job.client,
                freelancer,
            }),
        })
    }

    async fn decide_application(
        &self,
        request: DecideApplicationRequest,
    ) -> Result<DecideApplicationResponse, Error> {
        let user = *request.caller.require_user()?;

        let mut detail = self
            .applications
            .find_detail(request.application_id)
            .await
            .map_err(map_application_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("application {} not found", request.application_id))
            })?;

        if detail.job.client_id() != &user.id {
            return Err(Error::forbidden(
                "you do not have permission to update this application",
            ));
        }

        match detail
            .application
            .decide(request.decision, Utc::now())
            .map_err(|err| Error::conflict(err.to_string()))?
        {
            Decided::Updated(updated) => {
                self.applications
                    .update_status(&updated)
                    .await
                    .map_err(map_application_repository_error)?;
                detail.application = updated;
            }
            Decided::Unchanged => {}
        }

        Ok(DecideApplicationResponse {
            application: ApplicationPayload::from(detail),
        })
    }
}

/// Application service implementing the query driving port.
#[derive(Clone)]
pub struct ApplicationQueryService<J, A> {
    jobs: Arc<J>,
    applications: Arc<A>,
}

impl<J, A> ApplicationQueryService<J, A> {
    /// Create a new query service over the job and application repositories.
    pub fn new(jobs: Arc<J>, applications: Arc<A>) -> Self {
        Self { jobs, applications }
    }
}

#[async_trait]
impl<J, A> ApplicationQuery for ApplicationQueryService<J, A>
where
    J: JobRepository,
    A: ApplicationRepository,
{
    async fn list_my_applications(
        &self,
        request: ListMyApplicationsRequest,
    ) -> Result<ListMyApplicationsResponse, Error> {
        let user = *request.caller.require_role(
            Role::Freelancer,
            "only freelancers can view their applications",
        )?;

        let applications = self
            .applications
            .list_for_freelancer(&user.id)
            .await
            .map_err(map_application_repository_error)?;

        Ok(ListMyApplicationsResponse {
            applications: applications
                .into_iter()
                .map(ApplicationPayload::from)
                .collect(),
        })
    }

    async fn list_job_applications(
        &self,
        request: ListJobApplicationsRequest,
    ) -> Result<ListJobApplicationsResponse, Error> {
        let user = *request.caller.require_user()?;

        // Existence and ownership resolve in one lookup so a non-owner
        // cannot distinguish "not mine" from "does not exist".
        self.jobs
            .find_owned_with_client(request.job_id, &user.id)
            .await
            .map_err(map_job_repository_error)?
            .ok_or_else(|| job_not_found(request.job_id))?;

        let applications = self
            .applications
            .list_for_job(request.job_id)
            .await
            .map_err(map_application_repository_error)?;

        Ok(ListJobApplicationsResponse {
            applications: applications
                .into_iter()
                .map(ApplicationPayload::from)
                .collect(),
        })
    }
}

#[cfg(test)]
#[path = "application_service_tests.rs"]
mod tests;
