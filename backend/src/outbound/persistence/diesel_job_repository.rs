//! PostgreSQL-backed `JobRepository` implementation using Diesel ORM.
//!
//! Listing and detail reads join the owning client in one query; rows are
//! rehydrated through the validated domain constructors.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{JobRepository, JobRepositoryError};
use crate::domain::{Category, ExperienceLevel, Job, JobDraft, JobWithClient, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::diesel_user_repository::row_to_user;
use super::models::{JobActivityUpdate, JobRow, NewJobRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{jobs, users};

/// Diesel-backed implementation of the job repository port.
#[derive(Clone)]
pub struct DieselJobRepository {
    pool: DbPool,
}

impl DieselJobRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> JobRepositoryError {
    map_pool_error(error, JobRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> JobRepositoryError {
    match classify_diesel_error(error) {
        // Jobs carry no unique constraints beyond the primary key; hitting
        // one still must not panic.
        DieselFailure::UniqueViolation { constraint } => JobRepositoryError::query(constraint),
        DieselFailure::Connection(message) => JobRepositoryError::connection(message),
        DieselFailure::Query(message) => JobRepositoryError::query(message),
    }
}

/// Convert a database row into a validated domain job.
pub(crate) fn row_to_job(row: JobRow) -> Result<Job, JobRepositoryError> {
    let JobRow {
        id,
        client_id,
        title,
        description,
        category,
        budget,
        is_fixed_price,
        experience_level,
        deadline,
        is_active,
        created_at,
        updated_at,
    } = row;

    let category = category
        .parse::<Category>()
        .map_err(|err| JobRepositoryError::query(err.to_string()))?;
    let experience_level = experience_level
        .parse::<ExperienceLevel>()
        .map_err(|err| JobRepositoryError::query(err.to_string()))?;

    Job::new(JobDraft {
        id,
        client_id: UserId::from_uuid(client_id),
        title,
        description,
        category,
        budget,
        is_fixed_price,
        experience_level,
        deadline,
        is_active,
        created_at,
        updated_at,
    })
    .map_err(|err| JobRepositoryError::query(err.to_string()))
}

fn rows_to_job_with_client(
    (job, client): (JobRow, UserRow),
) -> Result<JobWithClient, JobRepositoryError> {
    Ok(JobWithClient {
        job: row_to_job(job)?,
        client: row_to_user(client).map_err(JobRepositoryError::query)?,
    })
}

#[async_trait]
impl JobRepository for DieselJobRepository {
    async fn insert(&self, job: &Job) -> Result<(), JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewJobRow {
            id: job.id(),
            client_id: *job.client_id().as_uuid(),
            title: job.title(),
            description: job.description(),
            category: job.category().as_str(),
            budget: job.budget(),
            is_fixed_price: job.is_fixed_price(),
            experience_level: job.experience_level().as_str(),
            deadline: job.deadline(),
            is_active: job.is_active(),
            created_at: job.created_at(),
            updated_at: job.updated_at(),
        };

        diesel::insert_into(jobs::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn update_activity(&self, job: &Job) -> Result<(), JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let update = JobActivityUpdate {
            is_active: job.is_active(),
            updated_at: job.updated_at(),
        };

        diesel::update(jobs::table.find(job.id()))
            .set(&update)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find_active_with_client(
        &self,
        job_id: Uuid,
    ) -> Result<Option<JobWithClient>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = jobs::table
            .inner_join(users::table)
            .filter(jobs::id.eq(job_id).and(jobs::is_active.eq(true)))
            .select((JobRow::as_select(), UserRow::as_select()))
            .first::<(JobRow, UserRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(rows_to_job_with_client).transpose()
    }

    async fn find_owned_with_client(
        &self,
        job_id: Uuid,
        owner: &UserId,
    ) -> Result<Option<JobWithClient>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = jobs::table
            .inner_join(users::table)
            .filter(jobs::id.eq(job_id).and(jobs::client_id.eq(owner.as_uuid())))
            .select((JobRow::as_select(), UserRow::as_select()))
            .first::<(JobRow, UserRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(rows_to_job_with_client).transpose()
    }

    async fn list_active_with_client(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<JobWithClient>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = jobs::table
            .inner_join(users::table)
            .filter(jobs::is_active.eq(true))
            .select((JobRow::as_select(), UserRow::as_select()))
            .into_boxed();
        if let Some(category) = category {
            query = query.filter(jobs::category.eq(category.as_str()));
        }

        let rows: Vec<(JobRow, UserRow)> = query
            .order(jobs::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(rows_to_job_with_client).collect()
    }

    async fn list_for_client(
        &self,
        owner: &UserId,
    ) -> Result<Vec<JobWithClient>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<(JobRow, UserRow)> = jobs::table
            .inner_join(users::table)
            .filter(jobs::client_id.eq(owner.as_uuid()))
            .order(jobs::created_at.desc())
            .select((JobRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(rows_to_job_with_client).collect()
    }
}
