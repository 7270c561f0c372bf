//! Driving port for application mutations.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ApplicationDecision, ApplicationDetail, ApplicationStatus, Caller, Error};

use super::identity::UserPayload;
use super::job_command::JobPayload;

/// Serializable projection of an application with its job and both parties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub id: Uuid,
    pub job: JobPayload,
    pub freelancer: UserPayload,
    pub cover_letter: String,
    pub bid_amount: Option<BigDecimal>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApplicationDetail> for ApplicationPayload {
    fn from(value: ApplicationDetail) -> Self {
        let ApplicationDetail {
            application,
            job,
            client,
            freelancer,
        } = value;
        Self {
            id: application.id(),
            job: JobPayload::from(crate::domain::JobWithClient { job, client }),
            freelancer: UserPayload::from(freelancer),
            cover_letter: application.cover_letter().to_owned(),
            bid_amount: application.bid_amount().cloned(),
            status: application.status(),
            created_at: application.created_at(),
            updated_at: application.updated_at(),
        }
    }
}

/// Freelancer-supplied fields of a new application.
#[derive(Debug, Clone)]
pub struct ApplicationSubmission {
    pub cover_letter: String,
    pub bid_amount: Option<BigDecimal>,
}

/// Request to apply to a job.
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    pub caller: Caller,
    pub job_id: Uuid,
    pub submission: ApplicationSubmission,
}

/// Response from applying to a job.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResponse {
    pub application: ApplicationPayload,
}

/// Request to decide a pending application.
#[derive(Debug, Clone, Copy)]
pub struct DecideApplicationRequest {
    pub caller: Caller,
    pub application_id: Uuid,
    pub decision: ApplicationDecision,
}

/// Response from deciding an application.
#[derive(Debug, Clone, PartialEq)]
pub struct DecideApplicationResponse {
    pub application: ApplicationPayload,
}

/// Driving port for application write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationCommand: Send + Sync {
    /// Submit an application to an active job.
    ///
    /// Fails with `unauthorized`/`forbidden` on role violations, `not_found`
    /// when no active job matches, `invalid_request` on field violations, and
    /// `conflict` when the freelancer already applied.
    async fn apply(&self, request: ApplyRequest) -> Result<ApplyResponse, Error>;

    /// Accept or reject a pending application, as the job's owning client.
    ///
    /// Terminal states are terminal: a different decision on a resolved
    /// application fails with `conflict`; replaying the identical decision
    /// returns the stored application unchanged.
    async fn decide_application(
        &self,
        request: DecideApplicationRequest,
    ) -> Result<DecideApplicationResponse, Error>;
}

/// Fixture command implementation for tests that do not need persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureApplicationCommand;

#[async_trait]
impl ApplicationCommand for FixtureApplicationCommand {
    async fn apply(&self, request: ApplyRequest) -> Result<ApplyResponse, Error> {
        request.caller.require_role(
            crate::domain::Role::Freelancer,
            "only freelancers can apply to jobs",
        )?;
        Err(Error::not_found(format!("job {} not found", request.job_id)))
    }

    async fn decide_application(
        &self,
        request: DecideApplicationRequest,
    ) -> Result<DecideApplicationResponse, Error> {
        request.caller.require_user()?;
        Err(Error::not_found(format!(
            "application {} not found",
            request.application_id
        )))
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
    async fn fixture_apply_rejects_clients() {
        let command = FixtureApplicationCommand;
        let err = command
            .apply(ApplyRequest {
                caller: Caller::user(UserId::random(), Role::Client),
                job_id: Uuid::new_v4(),
                submission: ApplicationSubmission {
                    cover_letter: "I have shipped similar work.".to_owned(),
                    bid_amount: None,
                },
            })
            .await
            .expect_err("clients cannot apply");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_decide_is_not_found_for_authenticated_callers() {
        let command = FixtureApplicationCommand;
        let err = command
            .decide_application(DecideApplicationRequest {
                caller: Caller::user(UserId::random(), Role::Client),
                application_id: Uuid::new_v4(),
                decision: ApplicationDecision::Accepted,
            })
            .await
            .expect_err("fixture store is empty");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
