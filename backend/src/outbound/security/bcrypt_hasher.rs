//! bcrypt-backed [`PasswordHasher`].

use async_trait::async_trait;
use bcrypt::BcryptError;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::Password;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Hashes on the blocking pool; bcrypt is deliberately slow.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn map_bcrypt_error(error: BcryptError) -> PasswordHashError {
    match error {
        BcryptError::InvalidHash(_)
        | BcryptError::InvalidPrefix(_)
        | BcryptError::InvalidCost(_)
        | BcryptError::InvalidBase64(_) => PasswordHashError::malformed_hash(error.to_string()),
        other => PasswordHashError::hashing(other.to_string()),
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, PasswordHashError>
where
    F: FnOnce() -> Result<T, BcryptError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(work)
        .await
        .map_err(|error| PasswordHashError::hashing(format!("hashing task failed: {error}")))?
        .map_err(map_bcrypt_error)
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<String, PasswordHashError> {
        let secret = Zeroizing::new(password.expose().to_owned());
        let cost = self.cost;
        run_blocking(move || bcrypt::hash(secret.as_bytes(), cost)).await
    }

    async fn verify(&self, password: &Password, hash: &str) -> Result<bool, PasswordHashError> {
        let secret = Zeroizing::new(password.expose().to_owned());
        let hash = hash.to_owned();
        run_blocking(move || bcrypt::verify(secret.as_bytes(), &hash)).await
    }
}
