//! Stadium attendance flags, one per supporter and match.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::MatchId;
use super::user::UserId;

/// Whether a supporter has checked in to a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    #[schema(value_type = String)]
    pub match_id: MatchId,
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub checked_in: bool,
    /// Absent for the default record of a supporter who never checked in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CheckIn {
    /// Record returned when nothing is stored yet.
    #[must_use]
    pub fn absent(match_id: MatchId, user_id: UserId) -> Self {
        Self {
            match_id,
            user_id,
            checked_in: false,
            updated_at: None,
        }
    }
}

/// Supporters currently checked in to a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInSummary {
    #[schema(value_type = String)]
    pub match_id: MatchId,
    pub count: usize,
    #[schema(value_type = Vec<String>)]
    pub user_ids: Vec<UserId>,
}

impl CheckInSummary {
    /// Summarise stored records, keeping only positive flags in id order.
    #[must_use]
    pub fn from_records(match_id: MatchId, records: Vec<CheckIn>) -> Self {
        let mut user_ids: Vec<UserId> = records
            .into_iter()
            .filter(|record| record.checked_in)
            .map(|record| record.user_id)
            .collect();
        user_ids.sort();
        Self {
            match_id,
            count: user_ids.len(),
            user_ids,
        }
    }
}
