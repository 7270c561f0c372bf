//! Explicit caller context passed into every core operation.
//!
//! The core never reads ambient session state. The HTTP adapter resolves the
//! session cookie into a [`Caller`] once per request and hands it to the
//! services, which check the role capability they need.

use crate::domain::{Error, Role, UserId};

/// Identity attached to an inbound operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// No valid session accompanied the request.
    Anonymous,
    /// A session resolved to a registered user.
    User(AuthenticatedUser),
}

/// Resolved identity of an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub role: Role,
}

impl Caller {
    /// Build an authenticated caller.
    pub fn user(id: UserId, role: Role) -> Self {
        Self::User(AuthenticatedUser { id, role })
    }

    /// The authenticated identity, if any.
    pub fn authenticated(&self) -> Option<&AuthenticatedUser> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user),
        }
    }

    /// Require an authenticated caller or fail with `401 Unauthorized`.
    pub fn require_user(&self) -> Result<&AuthenticatedUser, Error> {
        self.authenticated()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require an authenticated caller with the given role.
    ///
    /// Anonymous callers fail with `unauthorized`; authenticated callers with
    /// a different role fail with `forbidden` carrying `message`.
    pub fn require_role(
        &self,
        role: Role,
        message: &'static str,
    ) -> Result<&AuthenticatedUser, Error> {
        let user = self.require_user()?;
        if user.role == role {
            Ok(user)
        } else {
            Err(Error::forbidden(message))
        }
    }
}
