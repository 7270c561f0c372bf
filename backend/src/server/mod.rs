//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::{
    FixtureApplicationCommand, FixtureApplicationQuery, FixtureIdentity, FixtureJobCommand,
    FixtureJobQuery,
};
use backend::domain::{
    ApplicationCommandService, ApplicationQueryService, IdentityService, JobCommandService,
    JobQueryService,
};
use backend::inbound::http::applications::{
    apply_to_job, job_applications, my_applications, update_application_status,
};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::jobs::{close_job, create_job, job_detail, list_jobs, my_jobs};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::inbound::http::users::{current_user, login, logout, register, update_profile};
use backend::outbound::persistence::{
    DieselApplicationRepository, DieselJobRepository, DieselUserRepository,
};
use backend::outbound::security::Argon2PasswordHasher;

/// Build the HTTP state from configuration.
///
/// With a database pool, every port is Diesel-backed; without one, the
/// fixture ports serve empty data so the process still boots for smoke
/// tests.
fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            let jobs = Arc::new(DieselJobRepository::new(pool.clone()));
            let applications = Arc::new(DieselApplicationRepository::new(pool.clone()));
            let hasher = Arc::new(Argon2PasswordHasher::new());

            HttpState::new(HttpStatePorts {
                identity: Arc::new(IdentityService::new(users.clone(), hasher)),
                jobs: Arc::new(JobCommandService::new(jobs.clone(), users.clone())),
                jobs_query: Arc::new(JobQueryService::new(jobs.clone())),
                applications: Arc::new(ApplicationCommandService::new(
                    jobs.clone(),
                    applications.clone(),
                    users,
                )),
                applications_query: Arc::new(ApplicationQueryService::new(jobs, applications)),
            })
        }
        None => {
            tracing::warn!("no database pool configured; serving fixture data");
            HttpState::new(HttpStatePorts {
                identity: Arc::new(FixtureIdentity),
                jobs: Arc::new(FixtureJobCommand),
                jobs_query: Arc::new(FixtureJobQuery),
                applications: Arc::new(FixtureApplicationCommand),
                applications_query: Arc::new(FixtureApplicationQuery),
            })
        }
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
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
        .service(update_application_status);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
