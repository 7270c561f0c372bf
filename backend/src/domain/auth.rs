//! Authentication and registration payloads.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{Bio, Email, Role, UserValidationError, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the identity service.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada", "correct horse").unwrap();
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
///
/// The password stays zeroized in memory until the identity service hashes
/// it; the remaining fields are already domain values.
#[derive(Debug, Clone)]
pub struct RegistrationDraft {
    pub username: Username,
    pub email: Email,
    pub password: Zeroizing<String>,
    pub role: Role,
    pub bio: Option<Bio>,
}

/// Field-level errors raised while assembling a [`RegistrationDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    Username(UserValidationError),
    Email(UserValidationError),
    EmptyPassword,
    Role(UserValidationError),
    Bio(UserValidationError),
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(err) | Self::Email(err) | Self::Role(err) | Self::Bio(err) => {
                write!(f, "{err}")
            }
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl RegistrationDraft {
    /// Validate raw registration inputs into a draft.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        role: &str,
        bio: Option<String>,
    ) -> Result<Self, RegistrationValidationError> {
        let username = Username::new(username).map_err(RegistrationValidationError::Username)?;
        let email = Email::new(email).map_err(RegistrationValidationError::Email)?;
        if password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        let role = role
            .parse::<Role>()
            .map_err(RegistrationValidationError::Role)?;
        let bio = bio
            .map(Bio::new)
            .transpose()
            .map_err(RegistrationValidationError::Bio)?;

        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
            role,
            bio,
        })
    }
}

/// Partial profile update; `None` fields are left untouched.
///
/// Username and role are immutable after registration, so they have no slot
/// here.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<Email>,
    pub bio: Option<Bio>,
}

impl ProfileChanges {
    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.bio.is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada  ", "secret")]
    #[case("bob_builder", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn registration_rejects_unknown_role() {
        let err = RegistrationDraft::try_from_parts("ada", "ada@example.com", "pw", "admin", None)
            .expect_err("unknown role must fail");
        assert!(matches!(err, RegistrationValidationError::Role(_)));
    }

    #[rstest]
    fn registration_rejects_empty_password() {
        let err =
            RegistrationDraft::try_from_parts("ada", "ada@example.com", "", "client", None)
                .expect_err("empty password must fail");
        assert_eq!(err, RegistrationValidationError::EmptyPassword);
    }

    #[rstest]
    fn registration_accepts_valid_input() {
        let draft = RegistrationDraft::try_from_parts(
            "ada",
            "ada@example.com",
            "pw",
            "freelancer",
            Some("I build things.".to_owned()),
        )
        .expect("valid registration");
        assert_eq!(draft.role, Role::Freelancer);
        assert!(draft.bio.is_some());
    }
}
