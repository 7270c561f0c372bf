//! Port for user account persistence.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "user repository query failed: {message}",
        /// Insert or update hit the unique username constraint.
        DuplicateUsername => "username already taken: {message}",
        /// Insert or update hit the unique email constraint.
        DuplicateEmail => "email already registered: {message}",
    }
}

/// Stored account credentials: the public user plus its password hash.
///
/// Only the identity service sees this; the hash never crosses a driving
/// port.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Port for writing user accounts and reading identity projections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account with its password hash.
    ///
    /// Fails with a `Duplicate*` variant when the username or email is
    /// already registered (database unique constraints).
    async fn insert_account(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<(), UserPersistenceError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Find a user and their password hash by username, for login.
    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError>;

    /// Persist profile changes (email, bio) for an existing user.
    async fn update_profile(&self, user: &User) -> Result<(), UserPersistenceError>;
}

/// Fixture implementation for tests that do not exercise user persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert_account(
        &self,
        _user: &User,
        _password_hash: &str,
    ) -> Result<(), UserPersistenceError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_credentials_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        Ok(None)
    }

    async fn update_profile(&self, _user: &User) -> Result<(), UserPersistenceError> {
        Ok(())
    }
}
