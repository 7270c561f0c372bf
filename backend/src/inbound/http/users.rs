//! User API handlers.
//!
//! ```text
//! POST /api/v1/users/register
//! POST /api/v1/users/login
//! POST /api/v1/users/logout
//! GET  /api/v1/users/me
//! PUT  /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    AuthenticateRequest, CurrentUserRequest, RegisterRequest, UpdateProfileRequest, UserPayload,
};
use crate::domain::{
    Bio, Email, Error, LoginCredentials, LoginValidationError, ProfileChanges, RegistrationDraft,
    RegistrationValidationError, Role, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::resolve_caller;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Public user representation returned by every endpoint that nests users.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[schema(format = "uuid")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
}

impl From<UserPayload> for UserBody {
    fn from(value: UserPayload) -> Self {
        Self {
            id: value.id,
            username: value.username,
            email: value.email,
            role: value.role,
            bio: value.bio,
        }
    }
}

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub bio: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    pub username: String,
    pub password: String,
}

/// Partial profile update body; absent fields are left untouched.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequestBody {
    pub email: Option<String>,
    pub bio: Option<String>,
}

fn map_registration_error(err: RegistrationValidationError) -> Error {
    let field = match &err {
        RegistrationValidationError::Username(_) => "username",
        RegistrationValidationError::Email(_) => "email",
        RegistrationValidationError::EmptyPassword => "password",
        RegistrationValidationError::Role(_) => "role",
        RegistrationValidationError::Bio(_) => "bio",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequestBody,
    responses(
        (status = 201, description = "Account created", body = UserBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username or email already taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let draft = RegistrationDraft::try_from_parts(
        &body.username,
        &body.email,
        &body.password,
        &body.role,
        body.bio,
    )
    .map_err(map_registration_error)?;

    let response = state.identity.register(RegisterRequest { draft }).await?;
    Ok(HttpResponse::Created().json(UserBody::from(response.user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequestBody,
    responses(
        (
            status = 200,
            description = "Login success",
            body = UserBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<web::Json<UserBody>> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.username, &body.password)
        .map_err(map_login_validation_error)?;

    let response = state
        .identity
        .authenticate(AuthenticateRequest { credentials })
        .await?;
    session.persist_user(&UserId::from_uuid(response.user.id))?;
    Ok(web::Json(UserBody::from(response.user)))
}

/// End the session. Always succeeds, logged in or not.
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses((status = 200, description = "Session ended")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/users/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().finish()
}

/// Return the authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserBody),
        (status = 401, description = "Unauthorized", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("SessionCookie" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserBody>> {
    let caller = resolve_caller(&session, &state).await?;
    let response = state
        .identity
        .current_user(CurrentUserRequest { caller })
        .await?;
    Ok(web::Json(UserBody::from(response.user)))
}

/// Update the authenticated caller's email or bio.
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequestBody,
    responses(
        (status = 200, description = "Updated user", body = UserBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile",
    security(("SessionCookie" = []))
)]
#[put("/users/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequestBody>,
) -> ApiResult<web::Json<UserBody>> {
    let caller = resolve_caller(&session, &state).await?;
    let body = payload.into_inner();

    let email = body
        .email
        .map(Email::new)
        .transpose()
        .map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "email" }))
        })?;
    let bio = body
        .bio
        .map(Bio::new)
        .transpose()
        .map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "bio" }))
        })?;

    let response = state
        .identity
        .update_profile(UpdateProfileRequest {
            caller,
            changes: ProfileChanges { email, bio },
        })
        .await?;
    Ok(web::Json(UserBody::from(response.user)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::inbound::http::test_utils::{seeded_state, test_session_middleware};

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .service(register)
                .service(login)
                .service(logout)
                .service(current_user)
                .service(update_profile),
        )
    }

    #[rstest]
    #[actix_web::test]
    async fn register_then_login_round_trips() {
        let (state, _fixtures) = seeded_state();
        let app = actix_test::init_service(test_app(state)).await;

        let register_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/register")
                .set_json(json!({
                    "username": "new_client",
                    "email": "new@example.com",
                    "password": "hunter2!",
                    "role": "client"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(register_res.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(register_res).await;
        assert_eq!(created["username"], "new_client");
        assert_eq!(created["role"], "client");
        assert!(created.get("password").is_none());

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/login")
                .set_json(json!({ "username": "new_client", "password": "hunter2!" }))
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::OK);
        let cookie = login_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let me_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(me_res.status(), StatusCode::OK);
        let me: Value = actix_test::read_body_json(me_res).await;
        assert_eq!(me["username"], "new_client");
    }

    #[rstest]
    #[actix_web::test]
    async fn register_rejects_unknown_roles() {
        let (state, _fixtures) = seeded_state();
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/register")
                .set_json(json!({
                    "username": "new_user",
                    "email": "new@example.com",
                    "password": "hunter2!",
                    "role": "admin"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "role");
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_username_registration_conflicts() {
        let (state, fixtures) = seeded_state();
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/register")
                .set_json(json!({
                    "username": fixtures.client_username,
                    "email": "different@example.com",
                    "password": "hunter2!",
                    "role": "client"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[actix_web::test]
    async fn wrong_credentials_are_unauthorized_with_one_message() {
        let (state, fixtures) = seeded_state();
        let app = actix_test::init_service(test_app(state)).await;

        for (username, password) in [
            ("no_such_user", "password"),
            (fixtures.client_username, "wrong-password"),
        ] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/users/login")
                    .set_json(json!({ "username": username, "password": password }))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            let body: Value = actix_test::read_body_json(res).await;
            assert_eq!(body["message"], "invalid credentials");
        }
    }

    #[rstest]
    #[case("", "password", "username")]
    #[case("ada", "", "password")]
    #[actix_web::test]
    async fn blank_login_fields_are_invalid(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let (state, _fixtures) = seeded_state();
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/login")
                .set_json(json!({ "username": username, "password": password }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_ends_the_session() {
        let (state, fixtures) = seeded_state();
        let app = actix_test::init_service(test_app(state)).await;

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/login")
                .set_json(json!({
                    "username": fixtures.client_username,
                    "password": fixtures.password,
                }))
                .to_request(),
        )
        .await;
        let cookie = login_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let logout_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(logout_res.status(), StatusCode::OK);
        let cleared = logout_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie cleared");

        let me_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me")
                .cookie(cleared)
                .to_request(),
        )
        .await;
        assert_eq!(me_res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn current_user_requires_a_session() {
        let (state, _fixtures) = seeded_state();
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
