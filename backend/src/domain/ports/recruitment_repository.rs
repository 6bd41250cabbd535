//! Ports for recruitment posts and the requests sent to them.
//!
//! Both tables carry secondary indexes on the participants so that "mine",
//! "sent" and "received" listings avoid a full scan.

use async_trait::async_trait;

use crate::domain::{Recruitment, RecruitmentId, RecruitmentRequest, RequestId, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecruitmentRepository: Send + Sync {
    async fn save(&self, recruitment: &Recruitment) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &RecruitmentId) -> Result<Option<Recruitment>, RepositoryError>;

    async fn list(&self) -> Result<Vec<Recruitment>, RepositoryError>;

    /// Posts opened by `recruiter_id`, via the `recruiterId` index.
    async fn list_by_recruiter(
        &self,
        recruiter_id: &UserId,
    ) -> Result<Vec<Recruitment>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn save(&self, request: &RecruitmentRequest) -> Result<(), RepositoryError>;

    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<RecruitmentRequest>, RepositoryError>;

    /// Requests sent by `requester_id`.
    async fn list_by_requester(
        &self,
        requester_id: &UserId,
    ) -> Result<Vec<RecruitmentRequest>, RepositoryError>;

    /// Requests addressed to posts owned by `recruiter_id`.
    async fn list_by_recruiter(
        &self,
        recruiter_id: &UserId,
    ) -> Result<Vec<RecruitmentRequest>, RepositoryError>;
}
