//! Endpoint coverage for the job handlers over in-memory repositories.

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
            .service(list_jobs)
            .service(my_jobs)
            .service(create_job)
            .service(close_job)
            .service(job_detail),
    )
}

fn build_api_job() -> Value {
    json!({
        "title": "Build API",
        "description": "Need REST API built",
        "category": "web-development"
    })
}

#[rstest]
#[actix_web::test]
async fn create_then_get_round_trips() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_as(&app, fixtures.client_username, fixtures.password).await;

    let create_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/jobs")
            .cookie(cookie)
            .set_json(build_api_job())
            .to_request(),
    )
    .await;
    assert_eq!(create_res.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(create_res).await;
    assert_eq!(created["title"], "Build API");
    assert_eq!(created["isActive"], true);
    assert_eq!(created["budget"], Value::Null);
    assert_eq!(created["experienceLevel"], "entry");
    assert!(created.get("status").is_none());
    let job_id = created["id"].as_str().expect("job id").to_owned();

    let get_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/jobs/{job_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(get_res.status(), StatusCode::OK);
    let fetched: Value = actix_test::read_body_json(get_res).await;
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["createdAt"], created["createdAt"]);
    assert_eq!(fetched["client"]["username"], fixtures.client_username);
}

#[rstest]
#[actix_web::test]
async fn creation_requires_a_client_session() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;

    let anonymous = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/jobs")
            .set_json(build_api_job())
            .to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let cookie = login_as(&app, fixtures.freelancer_username, fixtures.password).await;
    let freelancer = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/jobs")
            .cookie(cookie)
            .set_json(build_api_job())
            .to_request(),
    )
    .await;
    assert_eq!(freelancer.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(freelancer).await;
    assert_eq!(body["message"], "only clients can post jobs");
}

#[rstest]
#[case(json!({"title": "ab", "description": "Need REST API built", "category": "web-development"}), "at least 3")]
#[case(json!({"title": "Build API", "description": "too short", "category": "web-development"}), "at least 10")]
#[case(json!({"title": "Build API", "description": "Need REST API built", "category": "gardening"}), "invalid category")]
#[case(json!({"title": "Build API", "description": "Need REST API built", "category": "web-development", "experienceLevel": "wizard"}), "invalid experience level")]
#[case(json!({"title": "Build API", "description": "Need REST API built", "category": "web-development", "budget": "-10"}), "not be negative")]
#[actix_web::test]
async fn creation_validates_fields(#[case] payload: Value, #[case] expected_fragment: &str) {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_as(&app, fixtures.client_username, fixtures.password).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/jobs")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    let message = body["message"].as_str().expect("error message");
    assert!(
        message.contains(expected_fragment),
        "expected {message:?} to mention {expected_fragment:?}"
    );
}

#[rstest]
#[actix_web::test]
async fn listing_is_public_and_newest_first() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_as(&app, fixtures.client_username, fixtures.password).await;

    for title in ["First job post", "Second job post"] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/jobs")
                .cookie(cookie.clone())
                .set_json(json!({
                    "title": title,
                    "description": "Need REST API built",
                    "category": "web-development"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/jobs").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let jobs: Value = actix_test::read_body_json(res).await;
    let jobs = jobs.as_array().expect("job array");
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["title"], "Second job post");
    assert_eq!(jobs[1]["title"], "First job post");
}

#[rstest]
#[actix_web::test]
async fn listing_filters_by_category_and_rejects_unknown_ones() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_as(&app, fixtures.client_username, fixtures.password).await;

    for (title, category) in [("Logo refresh work", "design"), ("API build work", "web-development")]
    {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/jobs")
                .cookie(cookie.clone())
                .set_json(json!({
                    "title": title,
                    "description": "Details to follow shortly",
                    "category": category
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let filtered = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/jobs?category=design")
            .to_request(),
    )
    .await;
    let jobs: Value = actix_test::read_body_json(filtered).await;
    let jobs = jobs.as_array().expect("job array");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["category"], "design");

    let unknown = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/jobs?category=gardening")
            .to_request(),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(unknown).await;
    assert_eq!(body["details"]["value"], "gardening");
}

#[rstest]
#[actix_web::test]
async fn my_jobs_requires_the_client_role() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;

    let cookie = login_as(&app, fixtures.freelancer_username, fixtures.password).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/jobs/mine")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn closed_jobs_leave_public_views_but_not_the_owner_listing() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_as(&app, fixtures.client_username, fixtures.password).await;

    let create_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/jobs")
            .cookie(cookie.clone())
            .set_json(build_api_job())
            .to_request(),
    )
    .await;
    let created: Value = actix_test::read_body_json(create_res).await;
    let job_id = created["id"].as_str().expect("job id").to_owned();

    let close_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/jobs/{job_id}/close"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(close_res.status(), StatusCode::OK);
    let closed: Value = actix_test::read_body_json(close_res).await;
    assert_eq!(closed["isActive"], false);

    let public_detail = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/jobs/{job_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(public_detail.status(), StatusCode::NOT_FOUND);

    let public_list = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/jobs").to_request(),
    )
    .await;
    let jobs: Value = actix_test::read_body_json(public_list).await;
    assert!(jobs.as_array().expect("job array").is_empty());

    let mine = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/jobs/mine")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let mine: Value = actix_test::read_body_json(mine).await;
    let mine = mine.as_array().expect("job array");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["isActive"], false);
}

#[rstest]
#[actix_web::test]
async fn closing_someone_elses_job_is_not_found() {
    let (state, fixtures) = seeded_state();
    let app = actix_test::init_service(test_app(state)).await;

    let owner_cookie = login_as(&app, fixtures.client_username, fixtures.password).await;
    let create_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/jobs")
            .cookie(owner_cookie)
            .set_json(build_api_job())
            .to_request(),
    )
    .await;
    let created: Value = actix_test::read_body_json(create_res).await;
    let job_id = created["id"].as_str().expect("job id").to_owned();

    let other_cookie = login_as(&app, fixtures.second_client_username, fixtures.password).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/jobs/{job_id}/close"))
            .cookie(other_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
