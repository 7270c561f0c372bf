//! Job registry domain services.
//!
//! These services implement the job driving ports: creation, closing, and
//! the public/owner listings. All authorization decisions happen here, on
//! the explicit caller context.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{
    CloseJobRequest, CloseJobResponse, CreateJobRequest, CreateJobResponse, GetJobRequest,
    GetJobResponse, JobCommand, JobPayload, JobQuery, JobRepository, JobRepositoryError,
    ListJobsRequest, ListJobsResponse, ListMyJobsRequest, ListMyJobsResponse, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Error, Job, JobDraft, JobWithClient, Role};

fn map_repository_error(error: JobRepositoryError) -> Error {
    match error {
        JobRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("job repository unavailable: {message}"))
        }
        JobRepositoryError::Query { message } => {
            Error::internal(format!("job repository error: {message}"))
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

/// Job service implementing the command driving port.
#[derive(Clone)]
pub struct JobCommandService<J, U> {
    jobs: Arc<J>,
    users: Arc<U>,
}

impl<J, U> JobCommandService<J, U> {
    /// Create a new command service over the job and user repositories.
    pub fn new(jobs: Arc<J>, users: Arc<U>) -> Self {
        Self { jobs, users }
    }
}

#[async_trait]
impl<J, U> JobCommand for JobCommandService<J, U>
where
    J: JobRepository,
    U: UserRepository,
{
    async fn create_job(&self, request: CreateJobRequest) -> Result<CreateJobResponse, Error> {
        let user = *request
            .caller
            .require_role(Role::Client, "only clients can post jobs")?;

        let now = Utc::now();
        let submission = request.submission;
        let job = Job::new(JobDraft {
            id: Uuid::new_v4(),
            client_id: user.id,
            title: submission.title,
            description: submission.description,
            category: submission.category,
            budget: submission.budget,
            is_fixed_price: submission.is_fixed_price,
            experience_level: submission.experience_level,
            deadline: submission.deadline,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.jobs.insert(&job).await.map_err(map_repository_error)?;

        // The caller context came from a live account lookup; a missing row
        // here means the account vanished mid-request.
        let client = self
            .users
            .find_by_id(&user.id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::internal(format!("client account {} missing", user.id)))?;

        Ok(CreateJobResponse {
            job: JobPayload::from(JobWithClient { job, client }),
        })
    }

    async fn close_job(&self, request: CloseJobRequest) -> Result<CloseJobResponse, Error> {
        let user = *request
            .caller
            .require_role(Role::Client, "only clients can manage jobs")?;

        let JobWithClient { mut job, client } = self
            .jobs
            .find_owned_with_client(request.job_id, &user.id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| job_not_found(request.job_id))?;

        if job.is_active() {
            job.close(Utc::now());
            self.jobs
                .update_activity(&job)
                .await
                .map_err(map_repository_error)?;
        }

        Ok(CloseJobResponse {
            job: JobPayload::from(JobWithClient { job, client }),
        })
    }
}

/// Job service implementing the query driving port.
#[derive(Clone)]
pub struct JobQueryService<J> {
    jobs: Arc<J>,
}

impl<J> JobQueryService<J> {
    /// Create a new query service over the job repository.
    pub fn new(jobs: Arc<J>) -> Self {
        Self { jobs }
    }
}

#[async_trait]
impl<J> JobQuery for JobQueryService<J>
where
    J: JobRepository,
{
    async fn list_jobs(&self, request: ListJobsRequest) -> Result<ListJobsResponse, Error> {
        let jobs = self
            .jobs
            .list_active_with_client(request.category)
            .await
            .map_err(map_repository_error)?;

        Ok(ListJobsResponse {
            jobs: jobs.into_iter().map(JobPayload::from).collect(),
        })
    }

    async fn get_job(&self, request: GetJobRequest) -> Result<GetJobResponse, Error> {
        let job = self
            .jobs
            .find_active_with_client(request.job_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| job_not_found(request.job_id))?;

        Ok(GetJobResponse {
            job: JobPayload::from(job),
        })
    }

    async fn list_my_jobs(
        &self,
        request: ListMyJobsRequest,
    ) -> Result<ListMyJobsResponse, Error> {
        let user = *request
            .caller
            .require_role(Role::Client, "only clients can view their jobs")?;

        let jobs = self
            .jobs
            .list_for_client(&user.id)
            .await
            .map_err(map_repository_error)?;

        Ok(ListMyJobsResponse {
            jobs: jobs.into_iter().map(JobPayload::from).collect(),
        })
    }
}

#[cfg(test)]
#[path = "job_service_tests.rs"]
mod tests;
