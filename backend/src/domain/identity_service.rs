//! Identity domain service: registration, login, caller resolution, and
//! profile updates.
//!
//! The session cookie itself stays in the HTTP adapter; this service only
//! sees user ids and credentials.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    AuthenticateRequest, AuthenticateResponse, CurrentUserRequest, CurrentUserResponse, Identity,
    PasswordHashError, PasswordHasher, RegisterRequest, RegisterResponse, UpdateProfileRequest,
    UpdateProfileResponse, UserPayload, UserPersistenceError, UserRepository,
};
use crate::domain::{Caller, Error, User, UserId};

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { .. } => {
            Error::conflict("username is already taken")
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("email is already registered")
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Identity service over a user repository and a password hasher.
#[derive(Clone)]
pub struct IdentityService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> IdentityService<R, H> {
    /// Create a new identity service.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<R, H> IdentityService<R, H>
where
    R: UserRepository,
{
    async fn load_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

#[async_trait]
impl<R, H> Identity for IdentityService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, Error> {
        let draft = request.draft;
        let password_hash = self
            .hasher
            .hash(draft.password.as_str())
            .map_err(map_hash_error)?;

        let user = User::new(
            UserId::random(),
            draft.username,
            draft.email,
            draft.role,
            draft.bio,
        );

        self.users
            .insert_account(&user, &password_hash)
            .await
            .map_err(map_persistence_error)?;

        Ok(RegisterResponse {
            user: UserPayload::from(user),
        })
    }

    async fn authenticate(
        &self,
        request: AuthenticateRequest,
    ) -> Result<AuthenticateResponse, Error> {
        let credentials = request.credentials;
        // Unknown usernames and wrong passwords share one failure path so
        // the endpoint is not a user-enumeration oracle.
        let invalid = || Error::unauthorized("invalid credentials");

        let stored = self
            .users
            .find_credentials_by_username(credentials.username())
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(invalid)?;

        if !self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
        {
            return Err(invalid());
        }

        Ok(AuthenticateResponse {
            user: UserPayload::from(stored.user),
        })
    }

    async fn resolve_caller(&self, user_id: Option<UserId>) -> Result<Caller, Error> {
        let Some(id) = user_id else {
            return Ok(Caller::Anonymous);
        };

        match self.users.find_by_id(&id).await {
            Ok(Some(user)) => Ok(Caller::user(*user.id(), user.role())),
            // A stale cookie pointing at a deleted account is anonymous, not
            // an error; the role gates downstream do the rejecting.
            Ok(None) => {
                tracing::debug!(user_id = %id, "session user no longer exists");
                Ok(Caller::Anonymous)
            }
            Err(err) => Err(map_persistence_error(err)),
        }
    }

    async fn current_user(
        &self,
        request: CurrentUserRequest,
    ) -> Result<CurrentUserResponse, Error> {
        let user = *request.caller.require_user()?;
        let user = self.load_user(&user.id).await?;

        Ok(CurrentUserResponse {
            user: UserPayload::from(user),
        })
    }

    async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<UpdateProfileResponse, Error> {
        let caller = *request.caller.require_user()?;
        let mut user = self.load_user(&caller.id).await?;

        let changes = request.changes;
        if let Some(email) = changes.email {
            user.set_email(email);
        }
        if let Some(bio) = changes.bio {
            user.set_bio(Some(bio));
        }

        self.users
            .update_profile(&user)
            .await
            .map_err(map_persistence_error)?;

        Ok(UpdateProfileResponse {
            user: UserPayload::from(user),
        })
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
