//! Restaurant guide for match days.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::RestaurantId;
use super::validation::{bounded_text, optional_text};
use super::Error;

const NAME_MAX: usize = 100;
const TAG_MAX: usize = 50;
const ADDRESS_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 1000;
const URL_MAX: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[schema(value_type = String)]
    pub restaurant_id: RestaurantId,
    #[schema(example = "Uosei")]
    pub name: String,
    #[schema(example = "Kokura")]
    pub area: String,
    #[schema(example = "Izakaya")]
    pub genre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// Exact match on each supplied filter.
    #[must_use]
    pub fn matches_filter(&self, area: Option<&str>, genre: Option<&str>) -> bool {
        area.is_none_or(|area| self.area == area) && genre.is_none_or(|genre| self.genre == genre)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantDraft {
    pub name: String,
    pub area: String,
    pub genre: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl RestaurantDraft {
    pub fn try_from_parts(
        name: &str,
        area: &str,
        genre: &str,
        address: Option<&str>,
        description: Option<&str>,
        url: Option<&str>,
    ) -> Result<Self, Error> {
        Ok(Self {
            name: bounded_text("name", name, 1, NAME_MAX)?,
            area: bounded_text("area", area, 1, TAG_MAX)?,
            genre: bounded_text("genre", genre, 1, TAG_MAX)?,
            address: optional_text("address", address, ADDRESS_MAX)?,
            description: optional_text("description", description, DESCRIPTION_MAX)?,
            url: optional_text("url", url, URL_MAX)?,
        })
    }

    #[must_use]
    pub fn into_restaurant(self, now: DateTime<Utc>) -> Restaurant {
        Restaurant {
            restaurant_id: RestaurantId::random(),
            name: self.name,
            area: self.area,
            genre: self.genre,
            address: self.address,
            description: self.description,
            url: self.url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. Blank optional fields clear the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub area: Option<String>,
    pub genre: Option<String>,
    pub address: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub url: Option<Option<String>>,
}

impl RestaurantPatch {
    pub fn try_from_parts(
        name: Option<&str>,
        area: Option<&str>,
        genre: Option<&str>,
        address: Option<&str>,
        description: Option<&str>,
        url: Option<&str>,
    ) -> Result<Self, Error> {
        let required = |field: &str, value: Option<&str>, max: usize| {
            value.map(|raw| bounded_text(field, raw, 1, max)).transpose()
        };
        let clearable = |field: &str, value: Option<&str>, max: usize| {
            value.map(|raw| optional_text(field, Some(raw), max)).transpose()
        };
        Ok(Self {
            name: required("name", name, NAME_MAX)?,
            area: required("area", area, TAG_MAX)?,
            genre: required("genre", genre, TAG_MAX)?,
            address: clearable("address", address, ADDRESS_MAX)?,
            description: clearable("description", description, DESCRIPTION_MAX)?,
            url: clearable("url", url, URL_MAX)?,
        })
    }

    pub fn apply(self, target: &mut Restaurant, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(area) = self.area {
            target.area = area;
        }
        if let Some(genre) = self.genre {
            target.genre = genre;
        }
        if let Some(address) = self.address {
            target.address = address;
        }
        if let Some(description) = self.description {
            target.description = description;
        }
        if let Some(url) = self.url {
            target.url = url;
        }
        target.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn restaurant() -> Restaurant {
        RestaurantDraft::try_from_parts("Uosei", "Kokura", "Izakaya", None, None, None)
            .expect("valid draft")
            .into_restaurant(Utc::now())
    }

    #[rstest]
    #[case(None, None, true)]
    #[case(Some("Kokura"), None, true)]
    #[case(Some("Kokura"), Some("Ramen"), false)]
    #[case(Some("Moji"), Some("Izakaya"), false)]
    fn filters_match_exactly(
        restaurant: Restaurant,
        #[case] area: Option<&str>,
        #[case] genre: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(restaurant.matches_filter(area, genre), expected);
    }

    #[rstest]
    fn patch_clears_blank_optional_fields(mut restaurant: Restaurant) {
        restaurant.url = Some("https://example.test".to_owned());
        RestaurantPatch::try_from_parts(None, None, Some("Yakitori"), None, None, Some(""))
            .expect("valid patch")
            .apply(&mut restaurant, Utc::now());
        assert_eq!(restaurant.genre, "Yakitori");
        assert!(restaurant.url.is_none());
    }

    #[rstest]
    fn patch_rejects_blank_required_fields() {
        assert!(RestaurantPatch::try_from_parts(Some(" "), None, None, None, None, None).is_err());
    }
}
