//! Port for supporter account persistence.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// Fails with [`RepositoryError::AlreadyExists`] when the id is taken,
    /// including by a soft-deleted account.
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;

    /// Overwrite an existing account.
    async fn save(&self, user: &User) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Every stored account, deleted ones included, in no particular order.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;
}
