//! Port for attendance flags keyed by match and supporter.

use async_trait::async_trait;

use crate::domain::{CheckIn, MatchId, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Insert or replace the record for `(match_id, user_id)`.
    async fn save(&self, check_in: &CheckIn) -> Result<(), RepositoryError>;

    async fn find(
        &self,
        match_id: &MatchId,
        user_id: &UserId,
    ) -> Result<Option<CheckIn>, RepositoryError>;

    /// All records stored for a match, whatever their flag.
    async fn list_for_match(&self, match_id: &MatchId) -> Result<Vec<CheckIn>, RepositoryError>;
}
