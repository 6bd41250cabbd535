//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::{Error, Password};

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// The hashing backend failed or its worker was cancelled.
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored hash is not in a recognised format.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

impl From<PasswordHashError> for Error {
    fn from(error: PasswordHashError) -> Self {
        Error::internal(error.to_string())
    }
}

/// Hash new passwords and verify submitted ones.
///
/// Implementations are expected to be slow on purpose and should keep the
/// work off the async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<String, PasswordHashError>;

    /// `Ok(false)` means the password does not match.
    async fn verify(&self, password: &Password, hash: &str) -> Result<bool, PasswordHashError>;
}
