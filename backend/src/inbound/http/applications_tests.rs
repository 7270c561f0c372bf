//! Endpoint coverage for the application handlers over in-memory
//! repositories.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::inbound::http::test_utils::{login_as, seeded_state, test_session_middleware};

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
            .service(crate::inbound::http::users::login)
            .service(crate::inbound::http::jobs::create_job)
            .service(apply_to_job)
            .service(my_applications)
            .service(job_applications)
            .service(update_application_status),
    )
}

async fn post_job<S, B>(app: &S, cookie: actix_web::cookie::Cookie<'static>) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/jobs")
            .cookie(cookie)
            .set_json(json!({
                "title": "Build API",
                "description": "Need REST API built",
                "category": "web-development"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(res).await;
    created["id"].as_str().expect("job id").to_owned()
}

fn cover_letter_payload() -> Value {
    json!({ "coverLetter": "I have shipped three similar systems." })
}

#[rstest]
#[actix_web::test]
async fn apply_creates_a_pending_application() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let client_cookie = login_as(&app, fixtures.client_username, fixtures.password).await;
    let job_id = post_job(&app, client_cookie).await;

    let freelancer_cookie = login_as(&app, fixtures.freelancer_username, fixtures.password).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/jobs/{job_id}/applications"))
            .cookie(freelancer_cookie)
            .set_json(json!({
                "coverLetter": "I have shipped three similar systems.",
                "bidAmount": "450.00"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["bidAmount"], "450.00");
    assert_eq!(body["job"]["id"], job_id);
    assert_eq!(body["freelancer"]["username"], fixtures.freelancer_username);
}

#[rstest]
#[actix_web::test]
async fn clients_cannot_apply_even_with_a_valid_payload() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let client_cookie = login_as(&app, fixtures.client_username, fixtures.password).await;
    let job_id = post_job(&app, client_cookie.clone()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/jobs/{job_id}/applications"))
            .cookie(client_cookie)
            .set_json(cover_letter_payload())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "only freelancers can apply to jobs");
}

#[rstest]
#[actix_web::test]
async fn short_cover_letters_cite_the_minimum_length() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let client_cookie = login_as(&app, fixtures.client_username, fixtures.password).await;
    let job_id = post_job(&app, client_cookie).await;

    let freelancer_cookie = login_as(&app, fixtures.freelancer_username, fixtures.password).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/jobs/{job_id}/applications"))
            .cookie(freelancer_cookie)
            .set_json(json!({ "coverLetter": "hi!!!" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert!(
        body["message"]
            .as_str()
            .expect("error message")
            .contains("at least 10")
    );
}

#[rstest]
#[actix_web::test]
async fn second_application_conflicts_and_listing_shows_one_entry() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let client_cookie = login_as(&app, fixtures.client_username, fixtures.password).await;
    let job_id = post_job(&app, client_cookie).await;

    let freelancer_cookie = login_as(&app, fixtures.freelancer_username, fixtures.password).await;
    for (attempt, expected) in [(1, StatusCode::CREATED), (2, StatusCode::CONFLICT)] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/jobs/{job_id}/applications"))
                .cookie(freelancer_cookie.clone())
                .set_json(cover_letter_payload())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected, "attempt {attempt}");
    }

    let mine = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/applications/mine")
            .cookie(freelancer_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(mine.status(), StatusCode::OK);
    let mine: Value = actix_test::read_body_json(mine).await;
    let entries = mine.as_array().expect("application array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["job"]["id"], job_id);
    assert_eq!(
        entries[0]["job"]["client"]["username"],
        fixtures.client_username
    );
}

#[rstest]
#[actix_web::test]
async fn job_applications_are_owner_only_and_opaque() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let owner_cookie = login_as(&app, fixtures.client_username, fixtures.password).await;
    let job_id = post_job(&app, owner_cookie.clone()).await;

    let freelancer_cookie = login_as(&app, fixtures.freelancer_username, fixtures.password).await;
    let applied = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/jobs/{job_id}/applications"))
            .cookie(freelancer_cookie)
            .set_json(cover_letter_payload())
            .to_request(),
    )
    .await;
    assert_eq!(applied.status(), StatusCode::CREATED);

    // The owner sees the freelancer detail.
    let owner_view = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/jobs/{job_id}/applications"))
            .cookie(owner_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(owner_view.status(), StatusCode::OK);
    let listed: Value = actix_test::read_body_json(owner_view).await;
    let listed = listed.as_array().expect("application array");
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed[0]["freelancer"]["username"],
        fixtures.freelancer_username
    );

    // A different authenticated client gets 404, not 403.
    let other_cookie = login_as(&app, fixtures.second_client_username, fixtures.password).await;
    let other_view = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/jobs/{job_id}/applications"))
            .cookie(other_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(other_view.status(), StatusCode::NOT_FOUND);

    // Anonymous callers are told to log in.
    let anonymous = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/jobs/{job_id}/applications"))
            .to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn status_updates_pass_the_full_authorization_chain() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let owner_cookie = login_as(&app, fixtures.client_username, fixtures.password).await;
    let job_id = post_job(&app, owner_cookie.clone()).await;

    let freelancer_cookie = login_as(&app, fixtures.freelancer_username, fixtures.password).await;
    let applied = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/jobs/{job_id}/applications"))
            .cookie(freelancer_cookie)
            .set_json(cover_letter_payload())
            .to_request(),
    )
    .await;
    let application: Value = actix_test::read_body_json(applied).await;
    let application_id = application["id"].as_str().expect("application id").to_owned();

    // Invalid status values never reach the workflow.
    let invalid = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/applications/{application_id}/status"))
            .cookie(owner_cookie.clone())
            .set_json(json!({ "status": "pending" }))
            .to_request(),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    // A non-owning client is forbidden even with a valid value.
    let other_cookie = login_as(&app, fixtures.second_client_username, fixtures.password).await;
    let forbidden = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/applications/{application_id}/status"))
            .cookie(other_cookie)
            .set_json(json!({ "status": "accepted" }))
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    // The owner accepts; the stored status flips.
    let accepted = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/applications/{application_id}/status"))
            .cookie(owner_cookie.clone())
            .set_json(json!({ "status": "accepted" }))
            .to_request(),
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::OK);
    let accepted: Value = actix_test::read_body_json(accepted).await;
    assert_eq!(accepted["status"], "accepted");

    // Replaying the identical decision stays 200; flipping it conflicts.
    let replay = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/applications/{application_id}/status"))
            .cookie(owner_cookie.clone())
            .set_json(json!({ "status": "accepted" }))
            .to_request(),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::OK);

    let flip = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/applications/{application_id}/status"))
            .cookie(owner_cookie)
            .set_json(json!({ "status": "rejected" }))
            .to_request(),
    )
    .await;
    assert_eq!(flip.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn unknown_application_ids_are_not_found() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_as(&app, fixtures.client_username, fixtures.password).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!(
                "/api/v1/applications/{}/status",
                uuid::Uuid::new_v4()
            ))
            .cookie(cookie)
            .set_json(json!({ "status": "accepted" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
