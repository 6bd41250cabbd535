//! Port for fixture persistence.

use async_trait::async_trait;

use crate::domain::{Match, MatchId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Insert or replace a fixture.
    async fn save(&self, fixture: &Match) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, RepositoryError>;

    /// Every fixture, unsorted.
    async fn list(&self) -> Result<Vec<Match>, RepositoryError>;
}
