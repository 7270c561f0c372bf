//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ApplicationCommand, ApplicationQuery, Identity, JobCommand, JobQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn Identity>,
    pub jobs: Arc<dyn JobCommand>,
    pub jobs_query: Arc<dyn JobQuery>,
    pub applications: Arc<dyn ApplicationCommand>,
    pub applications_query: Arc<dyn ApplicationQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn Identity>,
    pub jobs: Arc<dyn JobCommand>,
    pub jobs_query: Arc<dyn JobQuery>,
    pub applications: Arc<dyn ApplicationCommand>,
    pub applications_query: Arc<dyn ApplicationQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureApplicationCommand, FixtureApplicationQuery, FixtureIdentity,
    ///     FixtureJobCommand, FixtureJobQuery,
    /// };
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     identity: Arc::new(FixtureIdentity),
    ///     jobs: Arc::new(FixtureJobCommand),
    ///     jobs_query: Arc::new(FixtureJobQuery),
    ///     applications: Arc::new(FixtureApplicationCommand),
    ///     applications_query: Arc::new(FixtureApplicationQuery),
    /// });
    /// let _identity = state.identity.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            identity,
            jobs,
            jobs_query,
            applications,
            applications_query,
        } = ports;
        Self {
            identity,
            jobs,
            jobs_query,
            applications,
            applications_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
