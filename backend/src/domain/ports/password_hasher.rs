//! Port for password hashing and verification.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing failed (salt generation or parameter problems).
        Hash => "password hashing failed: {message}",
    }
}

/// Port hiding the concrete hash algorithm from the identity service.
///
/// Verification is infallible by design: a stored hash that cannot be parsed
/// is treated as a mismatch, which surfaces as the same "invalid credentials"
/// failure a wrong password produces.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored PHC string.
    fn verify(&self, password: &str, stored_hash: &str) -> bool;
}

/// Fixture hasher for tests: "hashes" by prefixing, never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> bool {
        stored_hash
            .strip_prefix("plain:")
            .is_some_and(|stored| stored == password)
    }
}
