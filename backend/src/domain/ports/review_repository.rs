//! Port for post-match reviews.

use async_trait::async_trait;

use crate::domain::{MatchId, Review};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> Result<(), RepositoryError>;

    /// Reviews for one match, read through the `matchId` index.
    async fn list_for_match(&self, match_id: &MatchId) -> Result<Vec<Review>, RepositoryError>;

    /// Every review; used for statistics.
    async fn list(&self) -> Result<Vec<Review>, RepositoryError>;
}
