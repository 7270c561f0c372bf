//! Behaviour coverage for the identity service.

use std::sync::Arc;

use rstest::rstest;

use super::IdentityService;
use crate::domain::ports::{
    AuthenticateRequest, CurrentUserRequest, FixturePasswordHasher, Identity, MockUserRepository,
    RegisterRequest, UpdateProfileRequest, UserCredentials, UserPersistenceError,
};
use crate::domain::{
    Bio, Caller, Email, ErrorCode, LoginCredentials, ProfileChanges, RegistrationDraft, Role,
    User, UserId, Username,
};

fn stored_user(id: UserId, role: Role) -> User {
    User::new(
        id,
        Username::new("ada").expect("valid username"),
        Email::new("ada@example.com").expect("valid email"),
        role,
        None,
    )
}

fn service(
    users: MockUserRepository,
) -> IdentityService<MockUserRepository, FixturePasswordHasher> {
    IdentityService::new(Arc::new(users), Arc::new(FixturePasswordHasher))
}

fn registration() -> RegistrationDraft {
    RegistrationDraft::try_from_parts("ada", "ada@example.com", "secret", "freelancer", None)
        .expect("valid draft")
}

fn credentials(username: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(username, password).expect("valid credentials")
}

#[rstest]
#[tokio::test]
async fn register_hashes_the_password_before_storing() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert_account()
        .times(1)
        .withf(|_, hash| hash == "plain:secret")
        .returning(|_, _| Ok(()));

    let response = service(users)
        .register(RegisterRequest {
            draft: registration(),
        })
        .await
        .expect("registration succeeds");
    assert_eq!(response.user.username, "ada");
    assert_eq!(response.user.role, Role::Freelancer);
}

#[rstest]
#[case(UserPersistenceError::duplicate_username("ada"), "username is already taken")]
#[case(
    UserPersistenceError::duplicate_email("ada@example.com"),
    "email is already registered"
)]
#[tokio::test]
async fn register_maps_unique_violations_to_conflict(
    #[case] failure: UserPersistenceError,
    #[case] expected_message: &str,
) {
    let mut users = MockUserRepository::new();
    let stored_failure = failure.clone();
    users
        .expect_insert_account()
        .returning(move |_, _| Err(stored_failure.clone()));

    let err = service(users)
        .register(RegisterRequest {
            draft: registration(),
        })
        .await
        .expect_err("duplicate account must conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), expected_message);
}

#[rstest]
#[tokio::test]
async fn authenticate_accepts_a_matching_password() {
    let id = UserId::random();
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_username()
        .returning(move |_| {
            Ok(Some(UserCredentials {
                user: stored_user(id, Role::Client),
                password_hash: "plain:secret".to_owned(),
            }))
        });

    let response = service(users)
        .authenticate(AuthenticateRequest {
            credentials: credentials("ada", "secret"),
        })
        .await
        .expect("login succeeds");
    assert_eq!(response.user.id, *id.as_uuid());
}

#[rstest]
#[tokio::test]
async fn unknown_username_and_wrong_password_fail_identically() {
    let mut unknown_users = MockUserRepository::new();
    unknown_users
        .expect_find_credentials_by_username()
        .returning(|_| Ok(None));
    let unknown = service(unknown_users)
        .authenticate(AuthenticateRequest {
            credentials: credentials("nobody", "secret"),
        })
        .await
        .expect_err("unknown username must fail");

    let mut known_users = MockUserRepository::new();
    known_users
        .expect_find_credentials_by_username()
        .returning(|_| {
            Ok(Some(UserCredentials {
                user: stored_user(UserId::random(), Role::Client),
                password_hash: "plain:secret".to_owned(),
            }))
        });
    let wrong_password = service(known_users)
        .authenticate(AuthenticateRequest {
            credentials: credentials("ada", "wrong"),
        })
        .await
        .expect_err("wrong password must fail");

    assert_eq!(unknown.code(), ErrorCode::Unauthorized);
    assert_eq!(unknown.code(), wrong_password.code());
    assert_eq!(unknown.message(), wrong_password.message());
}

#[rstest]
#[tokio::test]
async fn resolve_caller_turns_missing_ids_into_anonymous() {
    let users = MockUserRepository::new();
    let caller = service(users)
        .resolve_caller(None)
        .await
        .expect("resolution succeeds");
    assert_eq!(caller, Caller::Anonymous);
}

#[rstest]
#[tokio::test]
async fn resolve_caller_degrades_stale_sessions_to_anonymous() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let caller = service(users)
        .resolve_caller(Some(UserId::random()))
        .await
        .expect("stale session resolves");
    assert_eq!(caller, Caller::Anonymous);
}

#[rstest]
#[tokio::test]
async fn resolve_caller_carries_the_stored_role() {
    let id = UserId::random();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |lookup| Ok(Some(stored_user(*lookup, Role::Freelancer))));

    let caller = service(users)
        .resolve_caller(Some(id))
        .await
        .expect("resolution succeeds");
    let user = caller.authenticated().expect("caller is authenticated");
    assert_eq!(user.id, id);
    assert_eq!(user.role, Role::Freelancer);
}

#[rstest]
#[tokio::test]
async fn current_user_requires_authentication() {
    let err = service(MockUserRepository::new())
        .current_user(CurrentUserRequest {
            caller: Caller::Anonymous,
        })
        .await
        .expect_err("anonymous callers have no profile");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn update_profile_applies_partial_changes() {
    let id = UserId::random();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |lookup| Ok(Some(stored_user(*lookup, Role::Client))));
    users
        .expect_update_profile()
        .times(1)
        .withf(|user| {
            user.email().as_ref() == "new@example.com"
                && user.bio().is_some_and(|bio| bio.as_ref() == "Now with bio")
        })
        .returning(|_| Ok(()));

    let response = service(users)
        .update_profile(UpdateProfileRequest {
            caller: Caller::user(id, Role::Client),
            changes: ProfileChanges {
                email: Some(Email::new("new@example.com").expect("valid email")),
                bio: Some(Bio::new("Now with bio").expect("valid bio")),
            },
        })
        .await
        .expect("profile update succeeds");
    assert_eq!(response.user.email, "new@example.com");
    assert_eq!(response.user.bio.as_deref(), Some("Now with bio"));
    // Username and role are immutable.
    assert_eq!(response.user.username, "ada");
    assert_eq!(response.user.role, Role::Client);
}
