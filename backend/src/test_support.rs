//! In-memory adapters and state builders for tests.
//!
//! The store keeps every table in one mutex so the repository traits can be
//! exercised end-to-end without PostgreSQL. Uniqueness rules the database
//! enforces with constraints (usernames, emails, one application per job and
//! freelancer) are replicated here so conflict paths behave identically.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    ApplicationRepository, ApplicationRepositoryError, FixturePasswordHasher, JobRepository,
    JobRepositoryError, PasswordHasher, UserCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    ApplicationCommandService, ApplicationDetail, ApplicationQueryService, Category, Email,
    IdentityService, Job, JobApplication, JobCommandService, JobQueryService, JobWithClient, Role,
    User, UserId, Username,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

#[derive(Default)]
struct StoreState {
    accounts: Vec<(User, String)>,
    jobs: Vec<Job>,
    applications: Vec<JobApplication>,
}

/// Shared in-memory backing store implementing every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut state = self.state.lock().expect("store lock");
        f(&mut state)
    }

    fn user_by_id(state: &StoreState, id: &UserId) -> Option<User> {
        state
            .accounts
            .iter()
            .find(|(user, _)| user.id() == id)
            .map(|(user, _)| user.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_account(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<(), UserPersistenceError> {
        self.with_state(|state| {
            if state
                .accounts
                .iter()
                .any(|(existing, _)| existing.username() == user.username())
            {
                return Err(UserPersistenceError::duplicate_username(
                    user.username().as_ref(),
                ));
            }
            if state
                .accounts
                .iter()
                .any(|(existing, _)| existing.email() == user.email())
            {
                return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
            }
            state
                .accounts
                .push((user.clone(), password_hash.to_owned()));
            Ok(())
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.with_state(|state| Self::user_by_id(state, id)))
    }

    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        Ok(self.with_state(|state| {
            state
                .accounts
                .iter()
                .find(|(user, _)| user.username().as_ref() == username)
                .map(|(user, password_hash)| UserCredentials {
                    user: user.clone(),
                    password_hash: password_hash.clone(),
                })
        }))
    }

    async fn update_profile(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.with_state(|state| {
            if state.accounts.iter().any(|(existing, _)| {
                existing.id() != user.id() && existing.email() == user.email()
            }) {
                return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
            }
            match state
                .accounts
                .iter_mut()
                .find(|(existing, _)| existing.id() == user.id())
            {
                Some((existing, _)) => {
                    *existing = user.clone();
                    Ok(())
                }
                None => Err(UserPersistenceError::query("user not found")),
            }
        })
    }
}

#[async_trait]
impl JobRepository for InMemoryStore {
    async fn insert(&self, job: &Job) -> Result<(), JobRepositoryError> {
        self.with_state(|state| state.jobs.push(job.clone()));
        Ok(())
    }

    async fn update_activity(&self, job: &Job) -> Result<(), JobRepositoryError> {
        self.with_state(|state| {
            match state.jobs.iter_mut().find(|stored| stored.id() == job.id()) {
                Some(stored) => {
                    *stored = job.clone();
                    Ok(())
                }
                None => Err(JobRepositoryError::query("job not found")),
            }
        })
    }

    async fn find_active_with_client(
        &self,
        job_id: Uuid,
    ) -> Result<Option<JobWithClient>, JobRepositoryError> {
        self.with_state(|state| {
            state
                .jobs
                .iter()
                .find(|job| job.id() == job_id && job.is_active())
                .cloned()
                .map(|job| attach_client(state, job))
                .transpose()
        })
    }

    async fn find_owned_with_client(
        &self,
        job_id: Uuid,
        owner: &UserId,
    ) -> Result<Option<JobWithClient>, JobRepositoryError> {
        self.with_state(|state| {
            state
                .jobs
                .iter()
                .find(|job| job.id() == job_id && job.client_id() == owner)
                .cloned()
                .map(|job| attach_client(state, job))
                .transpose()
        })
    }

    async fn list_active_with_client(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<JobWithClient>, JobRepositoryError> {
        self.with_state(|state| {
            let mut jobs: Vec<Job> = state
                .jobs
                .iter()
                .filter(|job| job.is_active())
                .filter(|job| category.is_none_or(|wanted| job.category() == wanted))
                .cloned()
                .collect();
            jobs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            jobs.into_iter()
                .map(|job| attach_client(state, job))
                .collect()
        })
    }

    async fn list_for_client(
        &self,
        owner: &UserId,
    ) -> Result<Vec<JobWithClient>, JobRepositoryError> {
        self.with_state(|state| {
            let mut jobs: Vec<Job> = state
                .jobs
                .iter()
                .filter(|job| job.client_id() == owner)
                .cloned()
                .collect();
            jobs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            jobs.into_iter()
                .map(|job| attach_client(state, job))
                .collect()
        })
    }
}

fn attach_client(state: &StoreState, job: Job) -> Result<JobWithClient, JobRepositoryError> {
    let client = InMemoryStore::user_by_id(state, job.client_id())
        .ok_or_else(|| JobRepositoryError::query("job client missing"))?;
    Ok(JobWithClient { job, client })
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn insert(
        &self,
        application: &JobApplication,
    ) -> Result<(), ApplicationRepositoryError> {
        self.with_state(|state| {
            // Mirrors the database unique constraint on (job, freelancer).
            if state.applications.iter().any(|existing| {
                existing.job_id() == application.job_id()
                    && existing.freelancer_id() == application.freelancer_id()
            }) {
                return Err(ApplicationRepositoryError::duplicate(
                    "job_applications_job_id_freelancer_id_key",
                ));
            }
            state.applications.push(application.clone());
            Ok(())
        })
    }

    async fn update_status(
        &self,
        application: &JobApplication,
    ) -> Result<(), ApplicationRepositoryError> {
        self.with_state(|state| {
            match state
                .applications
                .iter_mut()
                .find(|stored| stored.id() == application.id())
            {
                Some(stored) => {
                    *stored = application.clone();
                    Ok(())
                }
                None => Err(ApplicationRepositoryError::query("application not found")),
            }
        })
    }

    async fn find_detail(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationDetail>, ApplicationRepositoryError> {
        self.with_state(|state| {
            state
                .applications
                .iter()
                .find(|application| application.id() == application_id)
                .cloned()
                .map(|application| attach_detail(state, application))
                .transpose()
        })
    }

    async fn list_for_freelancer(
        &self,
        freelancer: &UserId,
    ) -> Result<Vec<ApplicationDetail>, ApplicationRepositoryError> {
        self.with_state(|state| {
            let mut applications: Vec<JobApplication> = state
                .applications
                .iter()
                .filter(|application| application.freelancer_id() == freelancer)
                .cloned()
                .collect();
            applications.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            applications
                .into_iter()
                .map(|application| attach_detail(state, application))
                .collect()
        })
    }

    async fn list_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationDetail>, ApplicationRepositoryError> {
        self.with_state(|state| {
            let mut applications: Vec<JobApplication> = state
                .applications
                .iter()
                .filter(|application| application.job_id() == job_id)
                .cloned()
                .collect();
            applications.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            applications
                .into_iter()
                .map(|application| attach_detail(state, application))
                .collect()
        })
    }
}

fn attach_detail(
    state: &StoreState,
    application: JobApplication,
) -> Result<ApplicationDetail, ApplicationRepositoryError> {
    let job = state
        .jobs
        .iter()
        .find(|job| job.id() == application.job_id())
        .cloned()
        .ok_or_else(|| ApplicationRepositoryError::query("application job missing"))?;
    let client = InMemoryStore::user_by_id(state, job.client_id())
        .ok_or_else(|| ApplicationRepositoryError::query("job client missing"))?;
    let freelancer = InMemoryStore::user_by_id(state, application.freelancer_id())
        .ok_or_else(|| ApplicationRepositoryError::query("application freelancer missing"))?;
    Ok(ApplicationDetail {
        application,
        job,
        client,
        freelancer,
    })
}

/// Identifiers and credentials of the pre-registered test accounts.
#[derive(Debug, Clone, Copy)]
pub struct SeedUsers {
    pub client_id: UserId,
    pub freelancer_id: UserId,
    pub second_client_id: UserId,
    pub client_username: &'static str,
    pub second_client_username: &'static str,
    pub freelancer_username: &'static str,
    /// Shared plaintext password of every seeded account.
    pub password: &'static str,
}

const SEED_PASSWORD: &str = "password123";

fn seed_user(store: &InMemoryStore, username: &str, role: Role) -> UserId {
    let id = UserId::random();
    let user = User::new(
        id,
        Username::new(username).expect("seed username is valid"),
        Email::new(format!("{username}@example.com")).expect("seed email is valid"),
        role,
        None,
    );
    let hash = FixturePasswordHasher
        .hash(SEED_PASSWORD)
        .expect("fixture hashing never fails");
    store.with_state(|state| state.accounts.push((user, hash)));
    id
}

/// Build an [`HttpState`] wired to a fresh in-memory store seeded with two
/// clients and a freelancer, all sharing [`SeedUsers::password`].
pub fn seeded_http_state() -> (HttpState, SeedUsers) {
    let store = Arc::new(InMemoryStore::new());

    let seeds = SeedUsers {
        client_id: seed_user(&store, "client_one", Role::Client),
        second_client_id: seed_user(&store, "client_two", Role::Client),
        freelancer_id: seed_user(&store, "free_lancer", Role::Freelancer),
        client_username: "client_one",
        second_client_username: "client_two",
        freelancer_username: "free_lancer",
        password: SEED_PASSWORD,
    };

    let identity = Arc::new(IdentityService::new(
        store.clone(),
        Arc::new(FixturePasswordHasher),
    ));
    let state = HttpState::new(HttpStatePorts {
        identity,
        jobs: Arc::new(JobCommandService::new(store.clone(), store.clone())),
        jobs_query: Arc::new(JobQueryService::new(store.clone())),
        applications: Arc::new(ApplicationCommandService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        applications_query: Arc::new(ApplicationQueryService::new(store.clone(), store)),
    });

    (state, seeds)
}
