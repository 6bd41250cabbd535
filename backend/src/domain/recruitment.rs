//! "Watch together" matching: recruitment posts and join requests.
//!
//! A recruiter opens a post for a match with a fixed capacity. Other
//! supporters send requests; each approval increments `approvedCount`, and the
//! post closes itself once it is full.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{MatchId, RecruitmentId, RequestId};
use super::user::UserId;
use super::validation::{bounded_number, bounded_text, optional_text};
use super::Error;

pub const CAPACITY_MIN: i64 = 1;
pub const CAPACITY_MAX: i64 = 20;
const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 1000;
const MESSAGE_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecruitmentStatus {
    Active,
    Closed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    /// Pending and approved requests block a second request for the same post.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

/// A post looking for companions to watch a match with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recruitment {
    #[schema(value_type = String)]
    pub recruitment_id: RecruitmentId,
    #[schema(value_type = String)]
    pub recruiter_id: UserId,
    #[schema(value_type = String)]
    pub match_id: MatchId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub capacity: u8,
    #[serde(default)]
    pub approved_count: u8,
    pub status: RecruitmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recruitment {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == RecruitmentStatus::Active
    }

    pub fn ensure_active(&self) -> Result<(), Error> {
        if self.is_active() {
            Ok(())
        } else {
            Err(Error::conflict("recruitment is no longer accepting requests"))
        }
    }

    pub fn ensure_owner(&self, user_id: &UserId) -> Result<(), Error> {
        if &self.recruiter_id == user_id {
            Ok(())
        } else {
            Err(Error::forbidden("only the recruiter may manage this recruitment"))
        }
    }

    /// Count an approval and close the post once it is full.
    pub fn record_approval(&mut self, now: DateTime<Utc>) {
        self.approved_count = self.approved_count.saturating_add(1);
        if self.approved_count >= self.capacity {
            self.status = RecruitmentStatus::Closed;
        }
        self.updated_at = now;
    }

    /// Owner-initiated status change; only `closed` and `cancelled` are allowed.
    pub fn change_status(
        &mut self,
        status: RecruitmentStatus,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        if status == RecruitmentStatus::Active {
            return Err(Error::invalid_request("status must be closed or cancelled"));
        }
        self.status = status;
        self.updated_at = now;
        Ok(())
    }
}

/// Validated recruitment input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecruitmentDraft {
    pub match_id: MatchId,
    pub title: String,
    pub description: String,
    pub capacity: u8,
}

impl RecruitmentDraft {
    pub fn try_from_parts(
        match_id: &str,
        title: &str,
        description: Option<&str>,
        capacity: i64,
    ) -> Result<Self, Error> {
        let capacity = bounded_number("capacity", capacity, CAPACITY_MIN, CAPACITY_MAX)?;
        Ok(Self {
            match_id: MatchId::new(match_id.trim())?,
            title: bounded_text("title", title, 1, TITLE_MAX)?,
            description: optional_text("description", description, DESCRIPTION_MAX)?
                .unwrap_or_default(),
            capacity: u8::try_from(capacity).unwrap_or(u8::MAX),
        })
    }

    #[must_use]
    pub fn into_recruitment(self, recruiter_id: UserId, now: DateTime<Utc>) -> Recruitment {
        Recruitment {
            recruitment_id: RecruitmentId::random(),
            recruiter_id,
            match_id: self.match_id,
            title: self.title,
            description: self.description,
            capacity: self.capacity,
            approved_count: 0,
            status: RecruitmentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A supporter's request to join a recruitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentRequest {
    #[schema(value_type = String)]
    pub request_id: RequestId,
    #[schema(value_type = String)]
    pub recruitment_id: RecruitmentId,
    #[schema(value_type = String)]
    pub recruiter_id: UserId,
    #[schema(value_type = String)]
    pub requester_id: UserId,
    #[serde(default)]
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecruitmentRequest {
    /// Open a pending request for `recruitment`. Requesting one's own post is
    /// refused.
    pub fn open(
        recruitment: &Recruitment,
        requester_id: UserId,
        message: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, Error> {
        let message = optional_text("message", message, MESSAGE_MAX)?.unwrap_or_default();
        if recruitment.recruiter_id == requester_id {
            return Err(Error::invalid_request(
                "you cannot request to join your own recruitment",
            ));
        }
        Ok(Self {
            request_id: RequestId::random(),
            recruitment_id: recruitment.recruitment_id.clone(),
            recruiter_id: recruitment.recruiter_id.clone(),
            requester_id,
            message,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn ensure_pending(&self) -> Result<(), Error> {
        if self.status == RequestStatus::Pending {
            Ok(())
        } else {
            Err(Error::conflict("request has already been handled"))
        }
    }

    pub fn transition(&mut self, status: RequestStatus, now: DateTime<Utc>) -> Result<(), Error> {
        self.ensure_pending()?;
        self.status = status;
        self.updated_at = now;
        Ok(())
    }
}

/// Newest first, ties broken by id for stable output.
pub fn sort_newest_first<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, K)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn post() -> Recruitment {
        RecruitmentDraft::try_from_parts("m1", "Away day in Toyama", None, 2)
            .expect("valid draft")
            .into_recruitment(UserId::new("recruiter").expect("id"), Utc::now())
    }

    #[rstest]
    #[case(0)]
    #[case(21)]
    fn capacity_must_be_in_range(#[case] capacity: i64) {
        assert!(RecruitmentDraft::try_from_parts("m1", "title", None, capacity).is_err());
    }

    #[rstest]
    fn approvals_close_the_post_at_capacity(mut post: Recruitment) {
        post.record_approval(Utc::now());
        assert!(post.is_active());
        post.record_approval(Utc::now());
        assert_eq!(post.status, RecruitmentStatus::Closed);
        assert_eq!(post.approved_count, 2);
    }

    #[rstest]
    fn recruiters_cannot_request_their_own_post(post: Recruitment) {
        let error = RecruitmentRequest::open(&post, post.recruiter_id.clone(), None, Utc::now())
            .expect_err("own post");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn handled_requests_cannot_transition_again(post: Recruitment) {
        let mut request = RecruitmentRequest::open(
            &post,
            UserId::new("joiner").expect("id"),
            Some("See you there"),
            Utc::now(),
        )
        .expect("valid request");
        request
            .transition(RequestStatus::Rejected, Utc::now())
            .expect("pending request");
        let error = request
            .transition(RequestStatus::Approved, Utc::now())
            .expect_err("already handled");
        assert_eq!(error.code(), crate::domain::ErrorCode::Conflict);
    }

    #[rstest]
    fn owners_cannot_reactivate(mut post: Recruitment) {
        assert!(post.change_status(RecruitmentStatus::Active, Utc::now()).is_err());
        post.change_status(RecruitmentStatus::Cancelled, Utc::now())
            .expect("cancel");
        assert_eq!(post.status, RecruitmentStatus::Cancelled);
    }
}
