//! Opaque identifiers for stored records.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{FieldErrorCode, field_error};
use super::Error;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap an identifier taken from a request or a stored record.
            pub fn new(raw: impl Into<String>) -> Result<Self, Error> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(field_error(
                        $field,
                        FieldErrorCode::Missing,
                        concat!($field, " must not be empty"),
                    ));
                }
                Ok(Self(raw))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a fixture.
    MatchId, "matchId"
);
entity_id!(ReviewId, "reviewId");
entity_id!(ReportId, "reportId");
entity_id!(
    /// Identifier of a "watch together" post.
    RecruitmentId, "recruitmentId"
);
entity_id!(RequestId, "requestId");
entity_id!(ChatId, "chatId");
entity_id!(RestaurantId, "restaurantId");
