//! Port for job persistence and listing reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Job, JobWithClient, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by job repository adapters.
    pub enum JobRepositoryError {
        /// Repository connection could not be established.
        Connection => "job repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "job repository query failed: {message}",
    }
}

/// Port for writing jobs and reading job projections.
///
/// Every read that feeds an API response carries the owning client so
/// adapters resolve the join once, next to the data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Persist a newly created job.
    async fn insert(&self, job: &Job) -> Result<(), JobRepositoryError>;

    /// Persist a changed activity flag and update timestamp.
    async fn update_activity(&self, job: &Job) -> Result<(), JobRepositoryError>;

    /// Find an active job by id, with its client.
    async fn find_active_with_client(
        &self,
        job_id: Uuid,
    ) -> Result<Option<JobWithClient>, JobRepositoryError>;

    /// Find a job by id only if `owner` is its client, active or not.
    ///
    /// Returning `None` for a non-owner keeps job existence opaque.
    async fn find_owned_with_client(
        &self,
        job_id: Uuid,
        owner: &UserId,
    ) -> Result<Option<JobWithClient>, JobRepositoryError>;

    /// List active jobs, newest first, optionally narrowed to a category.
    async fn list_active_with_client(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<JobWithClient>, JobRepositoryError>;

    /// List every job owned by `owner` (active or not), newest first.
    async fn list_for_client(
        &self,
        owner: &UserId,
    ) -> Result<Vec<JobWithClient>, JobRepositoryError>;
}

/// Fixture implementation for tests that do not exercise job persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJobRepository;

#[async_trait]
impl JobRepository for FixtureJobRepository {
    async fn insert(&self, _job: &Job) -> Result<(), JobRepositoryError> {
        Ok(())
    }

    async fn update_activity(&self, _job: &Job) -> Result<(), JobRepositoryError> {
        Ok(())
    }

    async fn find_active_with_client(
        &self,
        _job_id: Uuid,
    ) -> Result<Option<JobWithClient>, JobRepositoryError> {
        Ok(None)
    }

    async fn find_owned_with_client(
        &self,
        _job_id: Uuid,
        _owner: &UserId,
    ) -> Result<Option<JobWithClient>, JobRepositoryError> {
        Ok(None)
    }

    async fn list_active_with_client(
        &self,
        _category: Option<Category>,
    ) -> Result<Vec<JobWithClient>, JobRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_client(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<JobWithClient>, JobRepositoryError> {
        Ok(Vec::new())
    }
}
