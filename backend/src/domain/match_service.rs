//! Fixtures and the per-match activity hanging off them: stadium check-ins and
//! post-match reviews.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::matches::sort_by_kickoff;
use crate::domain::ports::{CheckInRepository, MatchRepository, ReviewRepository};
use crate::domain::{
    CheckIn, CheckInSummary, Error, Match, MatchDraft, MatchId, MatchPatch, MatchStatus, Review,
    ReviewDraft, ReviewSummary, User,
};

#[derive(Clone)]
pub struct MatchService {
    matches: Arc<dyn MatchRepository>,
    check_ins: Arc<dyn CheckInRepository>,
    reviews: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl MatchService {
    pub fn new(
        matches: Arc<dyn MatchRepository>,
        check_ins: Arc<dyn CheckInRepository>,
        reviews: Arc<dyn ReviewRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            matches,
            check_ins,
            reviews,
            clock,
        }
    }

    /// Fixtures ordered by kickoff, optionally filtered by status.
    pub async fn list(&self, status: Option<MatchStatus>) -> Result<Vec<Match>, Error> {
        let mut matches: Vec<Match> = self
            .matches
            .list()
            .await?
            .into_iter()
            .filter(|fixture| status.is_none_or(|status| fixture.status == status))
            .collect();
        sort_by_kickoff(&mut matches);
        Ok(matches)
    }

    pub async fn get(&self, match_id: &MatchId) -> Result<Match, Error> {
        self.matches
            .find_by_id(match_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("match {match_id} not found")))
    }

    pub async fn create(&self, draft: MatchDraft) -> Result<Match, Error> {
        let fixture = draft.into_match(self.clock.utc());
        self.matches.save(&fixture).await?;
        info!(match_id = %fixture.match_id, opponent = %fixture.opponent, "match created");
        Ok(fixture)
    }

    pub async fn update(&self, match_id: &MatchId, patch: MatchPatch) -> Result<Match, Error> {
        let mut fixture = self.get(match_id).await?;
        patch.apply(&mut fixture, self.clock.utc());
        self.matches.save(&fixture).await?;
        Ok(fixture)
    }

    /// Set the caller's attendance flag. Cancelled fixtures refuse check-ins.
    pub async fn check_in(
        &self,
        actor: &User,
        match_id: &MatchId,
        checked_in: bool,
    ) -> Result<CheckIn, Error> {
        self.get(match_id).await?.ensure_active()?;
        let record = CheckIn {
            match_id: match_id.clone(),
            user_id: actor.user_id.clone(),
            checked_in,
            updated_at: Some(self.clock.utc()),
        };
        self.check_ins.save(&record).await?;
        Ok(record)
    }

    /// The caller's attendance flag, `false` when never set.
    pub async fn check_in_status(
        &self,
        actor: &User,
        match_id: &MatchId,
    ) -> Result<CheckIn, Error> {
        self.get(match_id).await?;
        Ok(self
            .check_ins
            .find(match_id, &actor.user_id)
            .await?
            .unwrap_or_else(|| CheckIn::absent(match_id.clone(), actor.user_id.clone())))
    }

    pub async fn attendees(&self, match_id: &MatchId) -> Result<CheckInSummary, Error> {
        self.get(match_id).await?;
        let records = self.check_ins.list_for_match(match_id).await?;
        Ok(CheckInSummary::from_records(match_id.clone(), records))
    }

    /// Post a review; each supporter reviews a match at most once.
    pub async fn add_review(
        &self,
        actor: &User,
        match_id: &MatchId,
        draft: ReviewDraft,
    ) -> Result<Review, Error> {
        self.get(match_id).await?;
        let existing = self.reviews.list_for_match(match_id).await?;
        if existing.iter().any(|review| review.user_id == actor.user_id) {
            return Err(Error::conflict("you have already reviewed this match"));
        }
        let review = draft.into_review(match_id.clone(), actor.user_id.clone(), self.clock.utc());
        self.reviews.create(&review).await?;
        Ok(review)
    }

    pub async fn reviews(&self, match_id: &MatchId) -> Result<ReviewSummary, Error> {
        self.get(match_id).await?;
        let reviews = self.reviews.list_for_match(match_id).await?;
        Ok(ReviewSummary::from_reviews(match_id.clone(), reviews))
    }
}

#[cfg(test)]
#[path = "match_service_tests.rs"]
mod tests;
