//! Job applications and their status state machine.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Job, User, UserId};

/// Validation errors returned by [`JobApplication::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationValidationError {
    CoverLetterTooShort { min: usize },
    NonPositiveBid,
    UnknownStatus,
}

impl fmt::Display for ApplicationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoverLetterTooShort { min } => {
                write!(f, "cover letter must be at least {min} characters")
            }
            Self::NonPositiveBid => write!(f, "bid amount must be greater than zero"),
            Self::UnknownStatus => write!(f, "status must be accepted or rejected"),
        }
    }
}

impl std::error::Error for ApplicationValidationError {}

/// Application lifecycle state.
///
/// `Pending` is the only initial state; `Accepted` and `Rejected` are
/// terminal and reachable solely through [`JobApplication::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// Stable wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = ApplicationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ApplicationValidationError::UnknownStatus),
        }
    }
}

/// Verdict a client may hand down on a pending application.
///
/// This is deliberately narrower than [`ApplicationStatus`]: `pending` is
/// not a decision, so callers cannot reset an application through the
/// decide operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationDecision {
    Accepted,
    Rejected,
}

impl ApplicationDecision {
    /// The terminal status this decision resolves to.
    pub fn status(self) -> ApplicationStatus {
        match self {
            Self::Accepted => ApplicationStatus::Accepted,
            Self::Rejected => ApplicationStatus::Rejected,
        }
    }
}

impl std::str::FromStr for ApplicationDecision {
    type Err = ApplicationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ApplicationValidationError::UnknownStatus),
        }
    }
}

/// Error raised when deciding an application that already left `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlreadyResolved {
    pub current: ApplicationStatus,
}

impl fmt::Display for AlreadyResolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "application has already been {}", self.current)
    }
}

impl std::error::Error for AlreadyResolved {}

/// Outcome of [`JobApplication::decide`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decided {
    /// The application moved out of `pending`; persist the returned copy.
    Updated(JobApplication),
    /// The requested decision matches the stored terminal state.
    Unchanged,
}

/// Minimum length of a cover letter after trimming.
pub const COVER_LETTER_MIN: usize = 10;

/// Input payload for [`JobApplication::new`].
#[derive(Debug, Clone)]
pub struct JobApplicationDraft {
    pub id: Uuid,
    pub job_id: Uuid,
    pub freelancer_id: UserId,
    pub cover_letter: String,
    pub bid_amount: Option<BigDecimal>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A freelancer's application to a job.
///
/// ## Invariants
/// - `cover_letter` is trimmed and at least [`COVER_LETTER_MIN`] characters.
/// - `bid_amount`, when present, is strictly positive.
/// - At most one application exists per `(job, freelancer)` pair; the
///   persistence layer enforces this with a unique constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct JobApplication {
    id: Uuid,
    job_id: Uuid,
    freelancer_id: UserId,
    cover_letter: String,
    bid_amount: Option<BigDecimal>,
    status: ApplicationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobApplication {
    /// Creates a validated application.
    pub fn new(draft: JobApplicationDraft) -> Result<Self, ApplicationValidationError> {
        let cover_letter = draft.cover_letter.trim().to_owned();
        if cover_letter.chars().count() < COVER_LETTER_MIN {
            return Err(ApplicationValidationError::CoverLetterTooShort {
                min: COVER_LETTER_MIN,
            });
        }

        if let Some(bid) = &draft.bid_amount {
            if bid <= &BigDecimal::from(0) {
                return Err(ApplicationValidationError::NonPositiveBid);
            }
        }

        Ok(Self {
            id: draft.id,
            job_id: draft.job_id,
            freelancer_id: draft.freelancer_id,
            cover_letter,
            bid_amount: draft.bid_amount,
            status: draft.status,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        })
    }

    /// Stable application identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identifier of the job applied to.
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Identifier of the applying freelancer.
    pub fn freelancer_id(&self) -> &UserId {
        &self.freelancer_id
    }

    /// Trimmed cover letter.
    pub fn cover_letter(&self) -> &str {
        self.cover_letter.as_str()
    }

    /// Optional bid amount.
    pub fn bid_amount(&self) -> Option<&BigDecimal> {
        self.bid_amount.as_ref()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Record creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply a client decision.
    ///
    /// Only a `pending` application can transition. Re-submitting the
    /// decision that already resolved the application reports
    /// [`Decided::Unchanged`] so callers can treat the replay as idempotent;
    /// any other decision on a resolved application fails.
    pub fn decide(
        &self,
        decision: ApplicationDecision,
        decided_at: DateTime<Utc>,
    ) -> Result<Decided, AlreadyResolved> {
        match self.status {
            ApplicationStatus::Pending => {
                let mut updated = self.clone();
                updated.status = decision.status();
                updated.updated_at = decided_at;
                Ok(Decided::Updated(updated))
            }
            current if current == decision.status() => Ok(Decided::Unchanged),
            current => Err(AlreadyResolved { current }),
        }
    }
}

/// Read model attaching the job, its owning client, and the applying
/// freelancer to an application, as returned by workflow queries.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDetail {
    pub application: JobApplication,
    pub job: Job,
    pub client: User,
    pub freelancer: User,
}
