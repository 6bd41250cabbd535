//! Port for the match-day restaurant guide.

use async_trait::async_trait;

use crate::domain::{Restaurant, RestaurantId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn save(&self, restaurant: &Restaurant) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &RestaurantId) -> Result<Option<Restaurant>, RepositoryError>;

    async fn list(&self) -> Result<Vec<Restaurant>, RepositoryError>;

    /// Remove a restaurant; returns `false` when nothing was stored.
    async fn delete(&self, id: &RestaurantId) -> Result<bool, RepositoryError>;
}
