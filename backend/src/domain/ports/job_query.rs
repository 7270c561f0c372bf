//! Driving port for job reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Caller, Category, Error};

use super::job_command::JobPayload;

/// Request for the public job listing.
#[derive(Debug, Clone, Copy)]
pub struct ListJobsRequest {
    pub caller: Caller,
    pub category: Option<Category>,
}

/// Response carrying the public job listing, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ListJobsResponse {
    pub jobs: Vec<JobPayload>,
}

/// Request for a single public job.
#[derive(Debug, Clone, Copy)]
pub struct GetJobRequest {
    pub caller: Caller,
    pub job_id: Uuid,
}

/// Response carrying a single job with its client.
#[derive(Debug, Clone, PartialEq)]
pub struct GetJobResponse {
    pub job: JobPayload,
}

/// Request for the calling client's own jobs.
#[derive(Debug, Clone, Copy)]
pub struct ListMyJobsRequest {
    pub caller: Caller,
}

/// Response carrying the caller's jobs (active or not), newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ListMyJobsResponse {
    pub jobs: Vec<JobPayload>,
}

/// Driving port for job read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobQuery: Send + Sync {
    /// List active jobs, optionally narrowed to a category. Public.
    async fn list_jobs(&self, request: ListJobsRequest) -> Result<ListJobsResponse, Error>;

    /// Fetch an active job by id. Public; inactive jobs are invisible here
    /// just as they are in the listing.
    async fn get_job(&self, request: GetJobRequest) -> Result<GetJobResponse, Error>;

    /// List every job owned by the calling client.
    async fn list_my_jobs(&self, request: ListMyJobsRequest)
    -> Result<ListMyJobsResponse, Error>;
}

/// Fixture query implementation for tests that do not need persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJobQuery;

#[async_trait]
impl JobQuery for FixtureJobQuery {
    async fn list_jobs(&self, _request: ListJobsRequest) -> Result<ListJobsResponse, Error> {
        Ok(ListJobsResponse { jobs: Vec::new() })
    }

    async fn get_job(&self, request: GetJobRequest) -> Result<GetJobResponse, Error> {
        Err(Error::not_found(format!("job {} not found", request.job_id)))
    }

    async fn list_my_jobs(
        &self,
        request: ListMyJobsRequest,
    ) -> Result<ListMyJobsResponse, Error> {
        request.caller.require_role(
            crate::domain::Role::Client,
            "only clients can view their jobs",
        )?;
        Ok(ListMyJobsResponse { jobs: Vec::new() })
    }
}
