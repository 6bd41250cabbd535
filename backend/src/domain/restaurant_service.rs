//! Match-day restaurant guide maintained by administrators.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::RestaurantRepository;
use crate::domain::{Error, Restaurant, RestaurantDraft, RestaurantId, RestaurantPatch};

#[derive(Clone)]
pub struct RestaurantService {
    restaurants: Arc<dyn RestaurantRepository>,
    clock: Arc<dyn Clock>,
}

impl RestaurantService {
    pub fn new(restaurants: Arc<dyn RestaurantRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { restaurants, clock }
    }

    /// Restaurants sorted by name, filtered on exact area and genre.
    pub async fn list(
        &self,
        area: Option<&str>,
        genre: Option<&str>,
    ) -> Result<Vec<Restaurant>, Error> {
        let mut restaurants: Vec<Restaurant> = self
            .restaurants
            .list()
            .await?
            .into_iter()
            .filter(|restaurant| restaurant.matches_filter(area, genre))
            .collect();
        restaurants.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.restaurant_id.cmp(&b.restaurant_id))
        });
        Ok(restaurants)
    }

    pub async fn get(&self, id: &RestaurantId) -> Result<Restaurant, Error> {
        self.restaurants
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("restaurant {id} not found")))
    }

    pub async fn create(&self, draft: RestaurantDraft) -> Result<Restaurant, Error> {
        let restaurant = draft.into_restaurant(self.clock.utc());
        self.restaurants.save(&restaurant).await?;
        info!(restaurant_id = %restaurant.restaurant_id, "restaurant added");
        Ok(restaurant)
    }

    pub async fn update(
        &self,
        id: &RestaurantId,
        patch: RestaurantPatch,
    ) -> Result<Restaurant, Error> {
        let mut restaurant = self.get(id).await?;
        patch.apply(&mut restaurant, self.clock.utc());
        self.restaurants.save(&restaurant).await?;
        Ok(restaurant)
    }

    pub async fn delete(&self, id: &RestaurantId) -> Result<(), Error> {
        if self.restaurants.delete(id).await? {
            info!(restaurant_id = %id, "restaurant removed");
            Ok(())
        } else {
            Err(Error::not_found(format!("restaurant {id} not found")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockRestaurantRepository;
    use crate::test_support::{MutableClock, fixture_timestamp};

    fn restaurant(name: &str, area: &str) -> Restaurant {
        RestaurantDraft::try_from_parts(name, area, "Izakaya", None, None, None)
            .expect("draft")
            .into_restaurant(fixture_timestamp())
    }

    fn service(repo: MockRestaurantRepository) -> RestaurantService {
        RestaurantService::new(
            Arc::new(repo),
            Arc::new(MutableClock::new(fixture_timestamp())),
        )
    }

    #[tokio::test]
    async fn list_filters_by_area_and_sorts_by_name() {
        let mut repo = MockRestaurantRepository::new();
        repo.expect_list().returning(|| {
            Ok(vec![
                restaurant("Uosei", "Kokura"),
                restaurant("Akari", "Kokura"),
                restaurant("Moji Port Grill", "Moji"),
            ])
        });
        let names: Vec<String> = service(repo)
            .list(Some("Kokura"), None)
            .await
            .expect("listed")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["Akari", "Uosei"]);
    }

    #[tokio::test]
    async fn deleting_a_missing_restaurant_is_not_found() {
        let mut repo = MockRestaurantRepository::new();
        repo.expect_delete().returning(|_| Ok(false));
        let error = service(repo)
            .delete(&RestaurantId::new("gone").expect("id"))
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
