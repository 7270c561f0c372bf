//! Driving port for registration, login, and profile operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Caller, Error, LoginCredentials, ProfileChanges, RegistrationDraft, Role, User, UserId,
};

/// Serializable public projection of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
}

impl From<User> for UserPayload {
    fn from(value: User) -> Self {
        Self {
            id: *value.id().as_uuid(),
            username: value.username().to_string(),
            email: value.email().to_string(),
            role: value.role(),
            bio: value.bio().map(|bio| bio.as_ref().to_owned()),
        }
    }
}

/// Request to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub draft: RegistrationDraft,
}

/// Response from registering a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterResponse {
    pub user: UserPayload,
}

/// Request to authenticate with username and password.
#[derive(Debug, Clone)]
pub struct AuthenticateRequest {
    pub credentials: LoginCredentials,
}

/// Response from a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticateResponse {
    pub user: UserPayload,
}

/// Request for the authenticated caller's profile.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUserRequest {
    pub caller: Caller,
}

/// Response carrying the caller's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUserResponse {
    pub user: UserPayload,
}

/// Request to update the caller's profile.
#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    pub caller: Caller,
    pub changes: ProfileChanges,
}

/// Response carrying the updated profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProfileResponse {
    pub user: UserPayload,
}

/// Driving port for identity operations.
///
/// The HTTP adapter owns the session cookie; this port owns everything else:
/// credentials, account storage, and turning a session's user id back into a
/// [`Caller`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Identity: Send + Sync {
    /// Register a new account.
    ///
    /// Fails with `conflict` when the username or email is already taken.
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, Error>;

    /// Verify credentials and return the matching user.
    ///
    /// Unknown usernames and wrong passwords both fail with the identical
    /// `unauthorized` error so the endpoint is not a user-enumeration oracle.
    async fn authenticate(
        &self,
        request: AuthenticateRequest,
    ) -> Result<AuthenticateResponse, Error>;

    /// Resolve a session-stored user id into a caller context.
    ///
    /// `None` and ids that no longer resolve to an account (stale cookies)
    /// both yield [`Caller::Anonymous`].
    async fn resolve_caller(&self, user_id: Option<UserId>) -> Result<Caller, Error>;

    /// Return the authenticated caller's profile.
    async fn current_user(&self, request: CurrentUserRequest)
    -> Result<CurrentUserResponse, Error>;

    /// Apply partial profile changes for the authenticated caller.
    async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<UpdateProfileResponse, Error>;
}

/// Fixture identity for tests that never authenticate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentity;

#[async_trait]
impl Identity for FixtureIdentity {
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, Error> {
        let draft = request.draft;
        Ok(RegisterResponse {
            user: UserPayload {
                id: Uuid::new_v4(),
                username: draft.username.to_string(),
                email: draft.email.to_string(),
                role: draft.role,
                bio: draft.bio.map(|bio| bio.as_ref().to_owned()),
            },
        })
    }

    async fn authenticate(
        &self,
        _request: AuthenticateRequest,
    ) -> Result<AuthenticateResponse, Error> {
        Err(Error::unauthorized("invalid credentials"))
    }

    async fn resolve_caller(&self, _user_id: Option<UserId>) -> Result<Caller, Error> {
        Ok(Caller::Anonymous)
    }

    async fn current_user(
        &self,
        _request: CurrentUserRequest,
    ) -> Result<CurrentUserResponse, Error> {
        Err(Error::unauthorized("login required"))
    }

    async fn update_profile(
        &self,
        _request: UpdateProfileRequest,
    ) -> Result<UpdateProfileResponse, Error> {
        Err(Error::unauthorized("login required"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[tokio::test]
    async fn fixture_resolves_everything_to_anonymous() {
        let identity = FixtureIdentity;
        let caller = identity
            .resolve_caller(Some(UserId::random()))
            .await
            .expect("fixture resolve succeeds");
        assert_eq!(caller, Caller::Anonymous);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_authentication_is_unauthorized() {
        let identity = FixtureIdentity;
        let credentials =
            LoginCredentials::try_from_parts("ada", "pw").expect("valid credentials");
        let err = identity
            .authenticate(AuthenticateRequest { credentials })
            .await
            .expect_err("fixture login must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_registration_echoes_the_draft() {
        let identity = FixtureIdentity;
        let draft = RegistrationDraft::try_from_parts(
            "ada",
            "ada@example.com",
            "pw",
            "client",
            None,
        )
        .expect("valid draft");

        let response = identity
            .register(RegisterRequest { draft })
            .await
            .expect("fixture register succeeds");
        assert_eq!(response.user.username, "ada");
        assert_eq!(response.user.role, Role::Client);
    }
}
