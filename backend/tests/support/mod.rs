//! Shared helpers for the HTTP integration tests.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::json;

use backend::inbound::http::applications::{
    apply_to_job, job_applications, my_applications, update_application_status,
};
use backend::inbound::http::jobs::{close_job, create_job, job_detail, list_jobs, my_jobs};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{current_user, login, logout, register, update_profile};
use backend::test_support::seeded_http_state;

/// Session middleware mirroring the server wiring, minus the Secure flag.
fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Assemble the full API surface over a fresh seeded in-memory store.
pub fn marketplace_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let (state, _) = seeded_http_state();
    app_with_state(state)
}

/// Assemble the full API surface over the given state.
pub fn app_with_state(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .wrap(session_middleware())
            .service(register)
            .service(login)
            .service(logout)
            .service(current_user)
            .service(update_profile)
            .service(list_jobs)
            .service(my_jobs)
            .service(create_job)
            .service(close_job)
            .service(apply_to_job)
            .service(job_applications)
            .service(job_detail)
            .service(my_applications)
            .service(update_application_status),
    )
}

/// Register an account through the public API.
pub async fn register_user<S, B>(app: &S, username: &str, role: &str)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users/register")
            .set_json(json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "hunter2!",
                "role": role
            }))
            .to_request(),
    )
    .await;
    assert!(
        response.status().is_success(),
        "registration for {username} failed with {}",
        response.status()
    );
}

/// Log in through the public API and return the session cookie.
pub async fn login_user<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({ "username": username, "password": "hunter2!" }))
            .to_request(),
    )
    .await;
    assert!(
        response.status().is_success(),
        "login for {username} failed with {}",
        response.status()
    );
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
