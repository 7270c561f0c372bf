//! Driving port for application reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Caller, Error};

use super::application_command::ApplicationPayload;

/// Request for the calling freelancer's applications.
#[derive(Debug, Clone, Copy)]
pub struct ListMyApplicationsRequest {
    pub caller: Caller,
}

/// Response carrying the caller's applications, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ListMyApplicationsResponse {
    pub applications: Vec<ApplicationPayload>,
}

/// Request for every application to one of the caller's jobs.
#[derive(Debug, Clone, Copy)]
pub struct ListJobApplicationsRequest {
    pub caller: Caller,
    pub job_id: Uuid,
}

/// Response carrying a job's applications, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ListJobApplicationsResponse {
    pub applications: Vec<ApplicationPayload>,
}

/// Driving port for application read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationQuery: Send + Sync {
    /// List the calling freelancer's applications with job and client detail.
    async fn list_my_applications(
        &self,
        request: ListMyApplicationsRequest,
    ) -> Result<ListMyApplicationsResponse, Error>;

    /// List applications for a job the caller owns.
    ///
    /// Existence and ownership are checked together: a non-owner gets
    /// `not_found`, never `forbidden`, so the endpoint leaks nothing about
    /// other clients' jobs.
    async fn list_job_applications(
        &self,
        request: ListJobApplicationsRequest,
    ) -> Result<ListJobApplicationsResponse, Error>;
}

/// Fixture query implementation for tests that do not need persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureApplicationQuery;

#[async_trait]
impl ApplicationQuery for FixtureApplicationQuery {
    async fn list_my_applications(
        &self,
        request: ListMyApplicationsRequest,
    ) -> Result<ListMyApplicationsResponse, Error> {
        request.caller.require_role(
            crate::domain::Role::Freelancer,
            "only freelancers can view their applications",
        )?;
        Ok(ListMyApplicationsResponse {
            applications: Vec::new(),
        })
    }

    async fn list_job_applications(
        &self,
        request: ListJobApplicationsRequest,
    ) -> Result<ListJobApplicationsResponse, Error> {
        request.caller.require_user()?;
        Err(Error::not_found(format!("job {} not found", request.job_id)))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::{ErrorCode, Role, UserId};

    #[rstest]
    #[tokio::test]
    async fn fixture_my_applications_requires_a_freelancer() {
        let query = FixtureApplicationQuery;
        let err = query
            .list_my_applications(ListMyApplicationsRequest {
                caller: Caller::user(UserId::random(), Role::Client),
            })
            .await
            .expect_err("clients have no application listing");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_job_applications_hides_unknown_jobs() {
        let query = FixtureApplicationQuery;
        let err = query
            .list_job_applications(ListJobApplicationsRequest {
                caller: Caller::user(UserId::random(), Role::Client),
                job_id: Uuid::new_v4(),
            })
            .await
            .expect_err("fixture store is empty");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
