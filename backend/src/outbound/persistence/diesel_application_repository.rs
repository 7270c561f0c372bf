//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel.
//!
//! The insert path leans on the `(job_id, freelancer_id)` unique index for
//! duplicate detection; there is deliberately no pre-check. The users table
//! appears twice in a full detail (job client and freelancer), so the
//! freelancer side is resolved with a second keyed lookup instead of a
//! self-join alias.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ApplicationRepository, ApplicationRepositoryError};
use crate::domain::{
    ApplicationDetail, ApplicationStatus, JobApplication, JobApplicationDraft, User, UserId,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::diesel_job_repository::row_to_job;
use super::diesel_user_repository::row_to_user;
use super::models::{ApplicationRow, ApplicationStatusUpdate, JobRow, NewApplicationRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{job_applications, jobs, users};

/// Diesel-backed implementation of the application repository port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ApplicationRepositoryError {
    map_pool_error(error, ApplicationRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> ApplicationRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation { constraint } => {
            ApplicationRepositoryError::duplicate(constraint)
        }
        DieselFailure::Connection(message) => ApplicationRepositoryError::connection(message),
        DieselFailure::Query(message) => ApplicationRepositoryError::query(message),
    }
}

/// Convert a database row into a validated domain application.
fn row_to_application(row: ApplicationRow) -> Result<JobApplication, ApplicationRepositoryError> {
    let ApplicationRow {
        id,
        job_id,
        freelancer_id,
        cover_letter,
        bid_amount,
        status,
        created_at,
        updated_at,
    } = row;

    let status = status
        .parse::<ApplicationStatus>()
        .map_err(|err| ApplicationRepositoryError::query(err.to_string()))?;

    JobApplication::new(JobApplicationDraft {
        id,
        job_id,
        freelancer_id: UserId::from_uuid(freelancer_id),
        cover_letter,
        bid_amount,
        status,
        created_at,
        updated_at,
    })
    .map_err(|err| ApplicationRepositoryError::query(err.to_string()))
}

fn query_error(message: impl Into<String>) -> ApplicationRepositoryError {
    ApplicationRepositoryError::query(message)
}

impl DieselApplicationRepository {
    async fn load_users_by_id(
        &self,
        conn: &mut diesel_async::pooled_connection::bb8::PooledConnection<
            '_,
            diesel_async::AsyncPgConnection,
        >,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, User>, ApplicationRepositoryError> {
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(ids))
            .select(UserRow::as_select())
            .load(conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row_to_user(row).map(|user| (id, user)).map_err(query_error)
            })
            .collect()
    }
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn insert(
        &self,
        application: &JobApplication,
    ) -> Result<(), ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewApplicationRow {
            id: application.id(),
            job_id: application.job_id(),
            freelancer_id: *application.freelancer_id().as_uuid(),
            cover_letter: application.cover_letter(),
            bid_amount: application.bid_amount(),
            status: application.status().as_str(),
            created_at: application.created_at(),
            updated_at: application.updated_at(),
        };

        diesel::insert_into(job_applications::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn update_status(
        &self,
        application: &JobApplication,
    ) -> Result<(), ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let update = ApplicationStatusUpdate {
            status: application.status().as_str(),
            updated_at: application.updated_at(),
        };

        diesel::update(job_applications::table.find(application.id()))
            .set(&update)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find_detail(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationDetail>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = job_applications::table
            .inner_join(jobs::table.inner_join(users::table))
            .filter(job_applications::id.eq(application_id))
            .select((
                ApplicationRow::as_select(),
                JobRow::as_select(),
                UserRow::as_select(),
            ))
            .first::<(ApplicationRow, JobRow, UserRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        let Some((application_row, job_row, client_row)) = row else {
            return Ok(None);
        };

        let application = row_to_application(application_row)?;
        let freelancers = self
            .load_users_by_id(&mut conn, vec![*application.freelancer_id().as_uuid()])
            .await?;
        let freelancer = freelancers
            .get(application.freelancer_id().as_uuid())
            .cloned()
            .ok_or_else(|| query_error("application freelancer missing"))?;

        Ok(Some(ApplicationDetail {
            application,
            job: row_to_job(job_row).map_err(|err| query_error(err.to_string()))?,
            client: row_to_user(client_row).map_err(query_error)?,
            freelancer,
        }))
    }

    async fn list_for_freelancer(
        &self,
        freelancer: &UserId,
    ) -> Result<Vec<ApplicationDetail>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<(ApplicationRow, JobRow, UserRow)> = job_applications::table
            .inner_join(jobs::table.inner_join(users::table))
            .filter(job_applications::freelancer_id.eq(freelancer.as_uuid()))
            .order(job_applications::created_at.desc())
            .select((
                ApplicationRow::as_select(),
                JobRow::as_select(),
                UserRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        let freelancers = self
            .load_users_by_id(&mut conn, vec![*freelancer.as_uuid()])
            .await?;
        let freelancer_user = freelancers
            .get(freelancer.as_uuid())
            .cloned()
            .ok_or_else(|| query_error("application freelancer missing"))?;

        rows.into_iter()
            .map(|(application_row, job_row, client_row)| {
                Ok(ApplicationDetail {
                    application: row_to_application(application_row)?,
                    job: row_to_job(job_row).map_err(|err| query_error(err.to_string()))?,
                    client: row_to_user(client_row).map_err(query_error)?,
                    freelancer: freelancer_user.clone(),
                })
            })
            .collect()
    }

    async fn list_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationDetail>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<(ApplicationRow, JobRow, UserRow)> = job_applications::table
            .inner_join(jobs::table.inner_join(users::table))
            .filter(job_applications::job_id.eq(job_id))
            .order(job_applications::created_at.desc())
            .select((
                ApplicationRow::as_select(),
                JobRow::as_select(),
                UserRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        let freelancer_ids: Vec<Uuid> = rows
            .iter()
            .map(|(application, _, _)| application.freelancer_id)
            .collect();
        let freelancers = self.load_users_by_id(&mut conn, freelancer_ids).await?;

        rows.into_iter()
            .map(|(application_row, job_row, client_row)| {
                let application = row_to_application(application_row)?;
                let freelancer = freelancers
                    .get(application.freelancer_id().as_uuid())
                    .cloned()
                    .ok_or_else(|| query_error("application freelancer missing"))?;
                Ok(ApplicationDetail {
                    application,
                    job: row_to_job(job_row).map_err(|err| query_error(err.to_string()))?,
                    client: row_to_user(client_row).map_err(query_error)?,
                    freelancer,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion and error classification.

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> ApplicationRow {
        let now = Utc::now();
        ApplicationRow {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            freelancer_id: Uuid::new_v4(),
            cover_letter: "I have shipped three similar systems.".to_owned(),
            bid_amount: None,
            status: "pending".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn row_conversion_builds_a_domain_application(valid_row: ApplicationRow) {
        let application = row_to_application(valid_row).expect("valid row converts");
        assert_eq!(application.status(), ApplicationStatus::Pending);
    }

    #[rstest]
    fn row_conversion_rejects_unknown_statuses(mut valid_row: ApplicationRow) {
        valid_row.status = "maybe".to_owned();
        let err = row_to_application(valid_row).expect_err("unknown status must fail");
        assert!(matches!(err, ApplicationRepositoryError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_surface_as_connection_failures() {
        let err = map_pool(PoolError::checkout("refused"));
        assert!(matches!(
            err,
            ApplicationRepositoryError::Connection { .. }
        ));
    }
}
