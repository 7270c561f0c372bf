//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod application_command;
mod application_query;
mod application_repository;
mod identity;
mod job_command;
mod job_query;
mod job_repository;
mod password_hasher;
mod user_repository;

#[cfg(test)]
pub use application_command::MockApplicationCommand;
pub use application_command::{
    ApplicationCommand, ApplicationPayload, ApplicationSubmission, ApplyRequest, ApplyResponse,
    DecideApplicationRequest, DecideApplicationResponse, FixtureApplicationCommand,
};
#[cfg(test)]
pub use application_query::MockApplicationQuery;
pub use application_query::{
    ApplicationQuery, FixtureApplicationQuery, ListJobApplicationsRequest,
    ListJobApplicationsResponse, ListMyApplicationsRequest, ListMyApplicationsResponse,
};
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{
    ApplicationRepository, ApplicationRepositoryError, FixtureApplicationRepository,
};
#[cfg(test)]
pub use identity::MockIdentity;
pub use identity::{
    AuthenticateRequest, AuthenticateResponse, CurrentUserRequest, CurrentUserResponse,
    FixtureIdentity, Identity, RegisterRequest, RegisterResponse, UpdateProfileRequest,
    UpdateProfileResponse, UserPayload,
};
#[cfg(test)]
pub use job_command::MockJobCommand;
pub use job_command::{
    CloseJobRequest, CloseJobResponse, CreateJobRequest, CreateJobResponse, FixtureJobCommand,
    JobCommand, JobPayload, JobSubmission,
};
#[cfg(test)]
pub use job_query::MockJobQuery;
pub use job_query::{
    FixtureJobQuery, GetJobRequest, GetJobResponse, JobQuery, ListJobsRequest, ListJobsResponse,
    ListMyJobsRequest, ListMyJobsResponse,
};
#[cfg(test)]
pub use job_repository::MockJobRepository;
pub use job_repository::{FixtureJobRepository, JobRepository, JobRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, UserCredentials, UserPersistenceError, UserRepository,
};
