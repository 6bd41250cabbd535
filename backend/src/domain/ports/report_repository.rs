//! Port for moderation reports.

use async_trait::async_trait;

use crate::domain::{Report, ReportId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn save(&self, report: &Report) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError>;

    async fn list(&self) -> Result<Vec<Report>, RepositoryError>;
}
