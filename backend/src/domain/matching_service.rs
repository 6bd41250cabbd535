//! "Watch together" matching between supporters.
//!
//! Approval is a read-modify-write across two records (the request and its
//! post) without a conditional write; concurrent approvals of the last seat
//! may both succeed.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{MatchRepository, RecruitmentRepository, RequestRepository};
use crate::domain::recruitment::sort_newest_first;
use crate::domain::{
    Error, MatchId, Recruitment, RecruitmentDraft, RecruitmentId, RecruitmentRequest,
    RecruitmentStatus, RequestId, RequestStatus, User,
};

#[derive(Clone)]
pub struct MatchingService {
    matches: Arc<dyn MatchRepository>,
    recruitments: Arc<dyn RecruitmentRepository>,
    requests: Arc<dyn RequestRepository>,
    clock: Arc<dyn Clock>,
}

fn newest_recruitments_first(recruitments: &mut [Recruitment]) {
    sort_newest_first(recruitments, |r| (r.created_at, r.recruitment_id.clone()));
}

fn newest_requests_first(requests: &mut [RecruitmentRequest]) {
    sort_newest_first(requests, |r| (r.created_at, r.request_id.clone()));
}

impl MatchingService {
    pub fn new(
        matches: Arc<dyn MatchRepository>,
        recruitments: Arc<dyn RecruitmentRepository>,
        requests: Arc<dyn RequestRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            matches,
            recruitments,
            requests,
            clock,
        }
    }

    pub async fn create_recruitment(
        &self,
        actor: &User,
        draft: RecruitmentDraft,
    ) -> Result<Recruitment, Error> {
        let fixture = self
            .matches
            .find_by_id(&draft.match_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("match {} not found", draft.match_id)))?;
        fixture.ensure_active()?;
        let recruitment = draft.into_recruitment(actor.user_id.clone(), self.clock.utc());
        self.recruitments.save(&recruitment).await?;
        info!(
            recruitment_id = %recruitment.recruitment_id,
            recruiter_id = %recruitment.recruiter_id,
            "recruitment opened"
        );
        Ok(recruitment)
    }

    /// Posts newest first, filtered by match and status when given.
    pub async fn list_recruitments(
        &self,
        match_id: Option<&MatchId>,
        status: Option<RecruitmentStatus>,
    ) -> Result<Vec<Recruitment>, Error> {
        let mut recruitments: Vec<Recruitment> = self
            .recruitments
            .list()
            .await?
            .into_iter()
            .filter(|r| match_id.is_none_or(|id| &r.match_id == id))
            .filter(|r| status.is_none_or(|status| r.status == status))
            .collect();
        newest_recruitments_first(&mut recruitments);
        Ok(recruitments)
    }

    pub async fn my_recruitments(&self, actor: &User) -> Result<Vec<Recruitment>, Error> {
        let mut recruitments = self.recruitments.list_by_recruiter(&actor.user_id).await?;
        newest_recruitments_first(&mut recruitments);
        Ok(recruitments)
    }

    pub async fn get_recruitment(&self, id: &RecruitmentId) -> Result<Recruitment, Error> {
        self.recruitments
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("recruitment {id} not found")))
    }

    /// Close or cancel a post. Only its recruiter may do so.
    pub async fn change_recruitment_status(
        &self,
        actor: &User,
        id: &RecruitmentId,
        status: RecruitmentStatus,
    ) -> Result<Recruitment, Error> {
        let mut recruitment = self.get_recruitment(id).await?;
        recruitment.ensure_owner(&actor.user_id)?;
        recruitment.change_status(status, self.clock.utc())?;
        self.recruitments.save(&recruitment).await?;
        Ok(recruitment)
    }

    /// Ask to join a post.
    pub async fn send_request(
        &self,
        actor: &User,
        id: &RecruitmentId,
        message: Option<&str>,
    ) -> Result<RecruitmentRequest, Error> {
        let recruitment = self.get_recruitment(id).await?;
        let request = RecruitmentRequest::open(
            &recruitment,
            actor.user_id.clone(),
            message,
            self.clock.utc(),
        )?;
        recruitment.ensure_active()?;
        let already_requested = self
            .requests
            .list_by_requester(&actor.user_id)
            .await?
            .iter()
            .any(|existing| &existing.recruitment_id == id && existing.status.is_live());
        if already_requested {
            return Err(Error::conflict(
                "you already have an open request for this recruitment",
            ));
        }
        self.requests.save(&request).await?;
        Ok(request)
    }

    pub async fn sent_requests(&self, actor: &User) -> Result<Vec<RecruitmentRequest>, Error> {
        let mut requests = self.requests.list_by_requester(&actor.user_id).await?;
        newest_requests_first(&mut requests);
        Ok(requests)
    }

    pub async fn received_requests(&self, actor: &User) -> Result<Vec<RecruitmentRequest>, Error> {
        let mut requests = self.requests.list_by_recruiter(&actor.user_id).await?;
        newest_requests_first(&mut requests);
        Ok(requests)
    }

    async fn get_request(&self, id: &RequestId) -> Result<RecruitmentRequest, Error> {
        self.requests
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("request {id} not found")))
    }

    /// Approve or reject a pending request. Approval counts towards the
    /// post's capacity and closes it when full.
    pub async fn respond(
        &self,
        actor: &User,
        id: &RequestId,
        status: RequestStatus,
    ) -> Result<RecruitmentRequest, Error> {
        if !matches!(status, RequestStatus::Approved | RequestStatus::Rejected) {
            return Err(Error::invalid_request("status must be approved or rejected"));
        }
        let mut request = self.get_request(id).await?;
        if request.recruiter_id != actor.user_id {
            return Err(Error::forbidden("only the recruiter may respond to this request"));
        }
        request.ensure_pending()?;
        let now = self.clock.utc();
        if status == RequestStatus::Approved {
            let mut recruitment = self.get_recruitment(&request.recruitment_id).await?;
            recruitment.ensure_active()?;
            recruitment.record_approval(now);
            request.transition(status, now)?;
            self.requests.save(&request).await?;
            self.recruitments.save(&recruitment).await?;
            info!(
                request_id = %request.request_id,
                recruitment_id = %recruitment.recruitment_id,
                approved = recruitment.approved_count,
                capacity = recruitment.capacity,
                "request approved"
            );
        } else {
            request.transition(status, now)?;
            self.requests.save(&request).await?;
        }
        Ok(request)
    }

    /// Withdraw the caller's own pending request.
    pub async fn cancel_request(
        &self,
        actor: &User,
        id: &RequestId,
    ) -> Result<RecruitmentRequest, Error> {
        let mut request = self.get_request(id).await?;
        if request.requester_id != actor.user_id {
            return Err(Error::forbidden("only the requester may cancel this request"));
        }
        request.transition(RequestStatus::Cancelled, self.clock.utc())?;
        self.requests.save(&request).await?;
        Ok(request)
    }
}

#[cfg(test)]
#[path = "matching_service_tests.rs"]
mod tests;
