//! Port for job application persistence and detail reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ApplicationDetail, JobApplication, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by application repository adapters.
    pub enum ApplicationRepositoryError {
        /// Repository connection could not be established.
        Connection => "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "application repository query failed: {message}",
        /// Insert hit the `(job, freelancer)` unique constraint.
        ///
        /// Adapters must derive this from the database constraint, not from a
        /// racy pre-check, so duplicate submissions stay atomic.
        Duplicate => "application already exists: {message}",
    }
}

/// Port for writing applications and reading application detail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persist a newly submitted application.
    ///
    /// Fails with [`ApplicationRepositoryError::Duplicate`] when the
    /// freelancer already applied to the job.
    async fn insert(&self, application: &JobApplication)
    -> Result<(), ApplicationRepositoryError>;

    /// Persist a changed status and update timestamp.
    async fn update_status(
        &self,
        application: &JobApplication,
    ) -> Result<(), ApplicationRepositoryError>;

    /// Find an application by id with job, client, and freelancer attached.
    async fn find_detail(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationDetail>, ApplicationRepositoryError>;

    /// List a freelancer's applications, newest first.
    async fn list_for_freelancer(
        &self,
        freelancer: &UserId,
    ) -> Result<Vec<ApplicationDetail>, ApplicationRepositoryError>;

    /// List every application for a job, newest first.
    async fn list_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationDetail>, ApplicationRepositoryError>;
}

/// Fixture implementation for tests that do not exercise application
/// persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureApplicationRepository;

#[async_trait]
impl ApplicationRepository for FixtureApplicationRepository {
    async fn insert(
        &self,
        _application: &JobApplication,
    ) -> Result<(), ApplicationRepositoryError> {
        Ok(())
    }

    async fn update_status(
        &self,
        _application: &JobApplication,
    ) -> Result<(), ApplicationRepositoryError> {
        Ok(())
    }

    async fn find_detail(
        &self,
        _application_id: Uuid,
    ) -> Result<Option<ApplicationDetail>, ApplicationRepositoryError> {
        Ok(None)
    }

    async fn list_for_freelancer(
        &self,
        _freelancer: &UserId,
    ) -> Result<Vec<ApplicationDetail>, ApplicationRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_job(
        &self,
        _job_id: Uuid,
    ) -> Result<Vec<ApplicationDetail>, ApplicationRepositoryError> {
        Ok(Vec::new())
    }
}
