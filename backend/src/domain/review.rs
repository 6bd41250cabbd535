//! Post-match reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{MatchId, ReviewId};
use super::user::UserId;
use super::validation::{bounded_number, optional_text};
use super::Error;

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;
const COMMENT_MAX: usize = 1000;

/// A supporter's rating of a match. One per supporter and match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[schema(value_type = String)]
    pub review_id: ReviewId,
    #[schema(value_type = String)]
    pub match_id: MatchId,
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Validated review input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: u8,
    pub comment: String,
}

impl ReviewDraft {
    pub fn try_from_parts(rating: i64, comment: Option<&str>) -> Result<Self, Error> {
        let rating = bounded_number("rating", rating, RATING_MIN, RATING_MAX)?;
        let comment = optional_text("comment", comment, COMMENT_MAX)?.unwrap_or_default();
        Ok(Self {
            // bounded to 1..=5 above
            rating: u8::try_from(rating).unwrap_or(u8::MAX),
            comment,
        })
    }

    #[must_use]
    pub fn into_review(self, match_id: MatchId, user_id: UserId, now: DateTime<Utc>) -> Review {
        Review {
            review_id: ReviewId::random(),
            match_id,
            user_id,
            rating: self.rating,
            comment: self.comment,
            created_at: now,
        }
    }
}

/// Reviews for one match with the aggregate rating.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    #[schema(value_type = String)]
    pub match_id: MatchId,
    pub count: usize,
    /// Mean rating rounded to one decimal place; `null` without reviews.
    pub average_rating: Option<f64>,
    pub reviews: Vec<Review>,
}

impl ReviewSummary {
    /// Aggregate reviews, ordering them newest first.
    #[must_use]
    pub fn from_reviews(match_id: MatchId, mut reviews: Vec<Review>) -> Self {
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();
        let count = reviews.len();
        let average_rating = u32::try_from(count)
            .ok()
            .filter(|count| *count > 0)
            .map(|count| (f64::from(total) / f64::from(count) * 10.0).round() / 10.0);
        Self {
            match_id,
            count,
            average_rating,
            reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn review(rating: u8, minute: u32) -> Review {
        ReviewDraft::try_from_parts(i64::from(rating), None)
            .expect("valid draft")
            .into_review(
                MatchId::new("m1").expect("id"),
                UserId::new(format!("user{minute}")).expect("id"),
                Utc.with_ymd_and_hms(2026, 4, 12, 10, minute, 0)
                    .single()
                    .expect("timestamp"),
            )
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    fn rating_out_of_range_is_rejected(#[case] rating: i64) {
        assert!(ReviewDraft::try_from_parts(rating, None).is_err());
    }

    #[rstest]
    fn long_comments_are_rejected() {
        assert!(ReviewDraft::try_from_parts(4, Some(&"a".repeat(1001))).is_err());
    }

    #[rstest]
    fn summary_orders_newest_first_and_rounds_average() {
        let summary = ReviewSummary::from_reviews(
            MatchId::new("m1").expect("id"),
            vec![review(5, 1), review(4, 3), review(4, 2)],
        );
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average_rating, Some(4.3));
        assert_eq!(
            summary.reviews.first().map(|r| r.user_id.as_ref().to_owned()),
            Some("user3".to_owned())
        );
    }

    #[rstest]
    fn empty_summary_has_null_average() {
        let summary = ReviewSummary::from_reviews(MatchId::new("m1").expect("id"), Vec::new());
        let value = serde_json::to_value(summary).expect("serialise");
        assert!(value["averageRating"].is_null());
        assert_eq!(value["count"], 0);
    }
}
