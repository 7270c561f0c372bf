//! Job postings and their validation rules.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{User, UserId};

/// Validation errors returned by [`Job::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobValidationError {
    TitleTooShort { min: usize },
    TitleTooLong { max: usize },
    DescriptionTooShort { min: usize },
    NegativeBudget,
    UnknownCategory,
    UnknownExperienceLevel,
}

impl fmt::Display for JobValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TitleTooShort { min } => {
                write!(f, "title must be at least {min} characters")
            }
            Self::TitleTooLong { max } => {
                write!(f, "title must be at most {max} characters")
            }
            Self::DescriptionTooShort { min } => {
                write!(f, "description must be at least {min} characters")
            }
            Self::NegativeBudget => write!(f, "budget must not be negative"),
            Self::UnknownCategory => write!(f, "invalid category selected"),
            Self::UnknownExperienceLevel => write!(f, "invalid experience level selected"),
        }
    }
}

impl std::error::Error for JobValidationError {}

/// Closed set of job categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    WebDevelopment,
    MobileDevelopment,
    Design,
    Writing,
    Marketing,
    Other,
}

impl Category {
    /// Stable wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebDevelopment => "web-development",
            Self::MobileDevelopment => "mobile-development",
            Self::Design => "design",
            Self::Writing => "writing",
            Self::Marketing => "marketing",
            Self::Other => "other",
        }
    }

    /// All categories, in display order.
    pub const ALL: [Self; 6] = [
        Self::WebDevelopment,
        Self::MobileDevelopment,
        Self::Design,
        Self::Writing,
        Self::Marketing,
        Self::Other,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(JobValidationError::UnknownCategory)
    }
}

/// Experience a client expects from applicants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Intermediate,
    Expert,
}

impl ExperienceLevel {
    /// Stable wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(Self::Entry),
            "intermediate" => Ok(Self::Intermediate),
            "expert" => Ok(Self::Expert),
            _ => Err(JobValidationError::UnknownExperienceLevel),
        }
    }
}

/// Minimum length of a job title after trimming.
pub const TITLE_MIN: usize = 3;
/// Maximum length of a job title.
pub const TITLE_MAX: usize = 200;
/// Minimum length of a job description after trimming.
pub const DESCRIPTION_MIN: usize = 10;

/// Input payload for [`Job::new`].
///
/// Carries every stored field, including server-assigned identifiers and
/// timestamps; the services fill those in at creation, the persistence layer
/// when rehydrating rows.
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub id: Uuid,
    pub client_id: UserId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub budget: Option<BigDecimal>,
    pub is_fixed_price: bool,
    pub experience_level: ExperienceLevel,
    pub deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job posting owned by a client.
///
/// ## Invariants
/// - `title` is trimmed and at least [`TITLE_MIN`] characters.
/// - `description` is trimmed and at least [`DESCRIPTION_MIN`] characters.
/// - `budget`, when present, is not negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: Uuid,
    client_id: UserId,
    title: String,
    description: String,
    category: Category,
    budget: Option<BigDecimal>,
    is_fixed_price: bool,
    experience_level: ExperienceLevel,
    deadline: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a validated job. Title and description are trimmed before
    /// their length checks, mirroring what gets stored.
    pub fn new(draft: JobDraft) -> Result<Self, JobValidationError> {
        let title = draft.title.trim().to_owned();
        let title_length = title.chars().count();
        if title_length < TITLE_MIN {
            return Err(JobValidationError::TitleTooShort { min: TITLE_MIN });
        }
        if title_length > TITLE_MAX {
            return Err(JobValidationError::TitleTooLong { max: TITLE_MAX });
        }

        let description = draft.description.trim().to_owned();
        if description.chars().count() < DESCRIPTION_MIN {
            return Err(JobValidationError::DescriptionTooShort {
                min: DESCRIPTION_MIN,
            });
        }

        if let Some(budget) = &draft.budget {
            if budget < &BigDecimal::from(0) {
                return Err(JobValidationError::NegativeBudget);
            }
        }

        Ok(Self {
            id: draft.id,
            client_id: draft.client_id,
            title,
            description,
            category: draft.category,
            budget: draft.budget,
            is_fixed_price: draft.is_fixed_price,
            experience_level: draft.experience_level,
            deadline: draft.deadline,
            is_active: draft.is_active,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        })
    }

    /// Stable job identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identifier of the owning client.
    pub fn client_id(&self) -> &UserId {
        &self.client_id
    }

    /// Trimmed job title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Trimmed job description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Job category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Optional budget. Interpretation depends on [`Job::is_fixed_price`].
    pub fn budget(&self) -> Option<&BigDecimal> {
        self.budget.as_ref()
    }

    /// True for fixed-price work, false for hourly.
    pub fn is_fixed_price(&self) -> bool {
        self.is_fixed_price
    }

    /// Expected applicant experience.
    pub fn experience_level(&self) -> ExperienceLevel {
        self.experience_level
    }

    /// Optional submission deadline.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Visibility gate: only active jobs are listed publicly.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Record creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Take the job off the public listing. Idempotent; only bumps
    /// `updated_at` when the flag actually flips.
    pub fn close(&mut self, closed_at: DateTime<Utc>) {
        if self.is_active {
            self.is_active = false;
            self.updated_at = closed_at;
        }
    }
}

/// Read model pairing a job with its owning client, as returned by listing
/// and detail queries.
#[derive(Debug, Clone, PartialEq)]
pub struct JobWithClient {
    pub job: Job,
    pub client: User,
}
