//! "Watch together" recruitment endpoints.
//!
//! ```text
//! POST   /matching/recruitments                 {"matchId":"...","title":"...","capacity":3}
//! GET    /matching/recruitments?matchId=&status=
//! GET    /matching/recruitments/mine
//! GET    /matching/recruitments/{id}
//! PUT    /matching/recruitments/{id}/status     {"status":"closed"}
//! POST   /matching/recruitments/{id}/requests   {"message":"..."}
//! GET    /matching/requests/sent
//! GET    /matching/requests/received
//! PUT    /matching/requests/{id}                {"status":"approved"}
//! DELETE /matching/requests/{id}
//! ```

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, MatchId, Recruitment, RecruitmentDraft, RecruitmentId, RecruitmentRequest,
    RecruitmentStatus, RequestId, RequestStatus,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body for `POST /matching/recruitments`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecruitmentRequest {
    pub match_id: String,
    #[schema(example = "Two seats in the home end")]
    pub title: String,
    pub description: Option<String>,
    #[schema(minimum = 1, maximum = 10, example = 2)]
    pub capacity: i64,
}

impl TryFrom<CreateRecruitmentRequest> for RecruitmentDraft {
    type Error = Error;

    fn try_from(value: CreateRecruitmentRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.match_id,
            &value.title,
            value.description.as_deref(),
            value.capacity,
        )
    }
}

/// Query for `GET /matching/recruitments`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct RecruitmentListQuery {
    pub match_id: Option<String>,
    pub status: Option<RecruitmentStatus>,
}

/// Body for `PUT /matching/recruitments/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RecruitmentStatusRequest {
    /// `closed` or `cancelled`.
    pub status: RecruitmentStatus,
}

/// Body for `POST /matching/recruitments/{id}/requests`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct JoinRequest {
    pub message: Option<String>,
}

/// Body for `PUT /matching/requests/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RespondRequest {
    /// `approved` or `rejected`.
    pub status: RequestStatus,
}

/// Open a recruitment for a fixture.
#[utoipa::path(
    post,
    path = "/matching/recruitments",
    request_body = CreateRecruitmentRequest,
    responses(
        (status = 200, description = "Recruitment created", body = Recruitment),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Fixture not found", body = Error),
        (status = 409, description = "Fixture cancelled", body = Error)
    ),
    tags = ["matching"],
    operation_id = "createRecruitment"
)]
#[post("/matching/recruitments")]
pub async fn create_recruitment(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateRecruitmentRequest>,
) -> ApiResult<web::Json<Recruitment>> {
    let draft = RecruitmentDraft::try_from(payload.into_inner())?;
    Ok(web::Json(
        state.matching.create_recruitment(&caller, draft).await?,
    ))
}

/// Browse recruitments, newest first.
#[utoipa::path(
    get,
    path = "/matching/recruitments",
    params(RecruitmentListQuery),
    responses(
        (status = 200, description = "Recruitments", body = [Recruitment]),
        (status = 400, description = "Invalid filter", body = Error)
    ),
    tags = ["matching"],
    operation_id = "listRecruitments"
)]
#[get("/matching/recruitments")]
pub async fn list_recruitments(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    query: web::Query<RecruitmentListQuery>,
) -> ApiResult<web::Json<Vec<Recruitment>>> {
    let RecruitmentListQuery { match_id, status } = query.into_inner();
    let match_id = match_id.map(MatchId::new).transpose()?;
    let recruitments = state
        .matching
        .list_recruitments(match_id.as_ref(), status)
        .await?;
    Ok(web::Json(recruitments))
}

#[utoipa::path(
    get,
    path = "/matching/recruitments/mine",
    responses((status = 200, description = "The caller's recruitments", body = [Recruitment])),
    tags = ["matching"],
    operation_id = "myRecruitments"
)]
#[get("/matching/recruitments/mine")]
pub async fn my_recruitments(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Recruitment>>> {
    Ok(web::Json(state.matching.my_recruitments(&caller).await?))
}

#[utoipa::path(
    get,
    path = "/matching/recruitments/{id}",
    params(("id" = String, Path, description = "Recruitment identifier")),
    responses(
        (status = 200, description = "Recruitment", body = Recruitment),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["matching"],
    operation_id = "getRecruitment"
)]
#[get("/matching/recruitments/{id}")]
pub async fn get_recruitment(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Recruitment>> {
    let id = RecruitmentId::new(path.into_inner())?;
    Ok(web::Json(state.matching.get_recruitment(&id).await?))
}

/// Close or cancel the caller's own recruitment.
#[utoipa::path(
    put,
    path = "/matching/recruitments/{id}/status",
    params(("id" = String, Path, description = "Recruitment identifier")),
    request_body = RecruitmentStatusRequest,
    responses(
        (status = 200, description = "Updated recruitment", body = Recruitment),
        (status = 400, description = "Invalid status", body = Error),
        (status = 403, description = "Not the recruiter", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["matching"],
    operation_id = "changeRecruitmentStatus"
)]
#[put("/matching/recruitments/{id}/status")]
pub async fn change_recruitment_status(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<RecruitmentStatusRequest>,
) -> ApiResult<web::Json<Recruitment>> {
    let id = RecruitmentId::new(path.into_inner())?;
    let recruitment = state
        .matching
        .change_recruitment_status(&caller, &id, payload.status)
        .await?;
    Ok(web::Json(recruitment))
}

/// Ask to join a recruitment.
#[utoipa::path(
    post,
    path = "/matching/recruitments/{id}/requests",
    params(("id" = String, Path, description = "Recruitment identifier")),
    request_body = JoinRequest,
    responses(
        (status = 200, description = "Pending request", body = RecruitmentRequest),
        (status = 400, description = "Own recruitment or invalid message", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Recruitment closed or already requested", body = Error)
    ),
    tags = ["matching"],
    operation_id = "sendRequest"
)]
#[post("/matching/recruitments/{id}/requests")]
pub async fn send_request(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<JoinRequest>,
) -> ApiResult<web::Json<RecruitmentRequest>> {
    let id = RecruitmentId::new(path.into_inner())?;
    let request = state
        .matching
        .send_request(&caller, &id, payload.message.as_deref())
        .await?;
    Ok(web::Json(request))
}

#[utoipa::path(
    get,
    path = "/matching/requests/sent",
    responses(
        (status = 200, description = "Requests the caller has sent", body = [RecruitmentRequest])
    ),
    tags = ["matching"],
    operation_id = "sentRequests"
)]
#[get("/matching/requests/sent")]
pub async fn sent_requests(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<RecruitmentRequest>>> {
    Ok(web::Json(state.matching.sent_requests(&caller).await?))
}

#[utoipa::path(
    get,
    path = "/matching/requests/received",
    responses(
        (
            status = 200,
            description = "Requests for the caller's recruitments",
            body = [RecruitmentRequest]
        )
    ),
    tags = ["matching"],
    operation_id = "receivedRequests"
)]
#[get("/matching/requests/received")]
pub async fn received_requests(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<RecruitmentRequest>>> {
    Ok(web::Json(state.matching.received_requests(&caller).await?))
}

/// Approve or reject a pending request for one of the caller's recruitments.
#[utoipa::path(
    put,
    path = "/matching/requests/{id}",
    params(("id" = String, Path, description = "Request identifier")),
    request_body = RespondRequest,
    responses(
        (status = 200, description = "Updated request", body = RecruitmentRequest),
        (status = 400, description = "Invalid status", body = Error),
        (status = 403, description = "Not the recruiter", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Request not pending or recruitment closed", body = Error)
    ),
    tags = ["matching"],
    operation_id = "respondToRequest"
)]
#[put("/matching/requests/{id}")]
pub async fn respond_to_request(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<RespondRequest>,
) -> ApiResult<web::Json<RecruitmentRequest>> {
    let id = RequestId::new(path.into_inner())?;
    let request = state
        .matching
        .respond(&caller, &id, payload.status)
        .await?;
    Ok(web::Json(request))
}

/// Withdraw the caller's pending request.
#[utoipa::path(
    delete,
    path = "/matching/requests/{id}",
    params(("id" = String, Path, description = "Request identifier")),
    responses(
        (status = 200, description = "Cancelled request", body = RecruitmentRequest),
        (status = 403, description = "Not the requester", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Request not pending", body = Error)
    ),
    tags = ["matching"],
    operation_id = "cancelRequest"
)]
#[delete("/matching/requests/{id}")]
pub async fn cancel_request(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecruitmentRequest>> {
    let id = RequestId::new(path.into_inner())?;
    Ok(web::Json(state.matching.cancel_request(&caller, &id).await?))
}

#[cfg(test)]
#[path = "matching_tests.rs"]
mod tests;
