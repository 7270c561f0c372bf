//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserCredentials, UserPersistenceError, UserRepository};
use crate::domain::{Bio, Email, Role, User, UserId, Username};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

/// Map Diesel errors, routing unique violations to the matching duplicate
/// variant by constraint name.
fn map_diesel(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation { constraint } => {
            if constraint.contains("email") {
                UserPersistenceError::duplicate_email(constraint)
            } else {
                UserPersistenceError::duplicate_username(constraint)
            }
        }
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

/// Convert a database row into a validated domain user.
///
/// Stored rows already passed validation on the way in, so a failure here
/// means the row was edited out-of-band; surface it as a query error.
pub(crate) fn row_to_user(row: UserRow) -> Result<User, String> {
    let UserRow {
        id,
        username,
        email,
        password_hash: _,
        role,
        bio,
        created_at: _,
        updated_at: _,
    } = row;

    let username = Username::new(username).map_err(|err| err.to_string())?;
    let email = Email::new(email).map_err(|err| err.to_string())?;
    let role = role.parse::<Role>().map_err(|err| err.to_string())?;
    let bio = bio.map(Bio::new).transpose().map_err(|err| err.to_string())?;

    Ok(User::new(UserId::from_uuid(id), username, email, role, bio))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert_account(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            email: user.email().as_ref(),
            password_hash,
            role: user.role().as_str(),
            bio: user.bio().map(AsRef::as_ref),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(|row| row_to_user(row).map_err(UserPersistenceError::query))
            .transpose()
    }

    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(|row| {
            let password_hash = row.password_hash.clone();
            row_to_user(row)
                .map(|user| UserCredentials {
                    user,
                    password_hash,
                })
                .map_err(UserPersistenceError::query)
        })
        .transpose()
    }

    async fn update_profile(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let update = UserProfileUpdate {
            email: user.email().as_ref(),
            bio: user.bio().map(AsRef::as_ref),
            updated_at: Utc::now(),
        };

        diesel::update(users::table.find(user.id().as_uuid()))
            .set(&update)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }
}
