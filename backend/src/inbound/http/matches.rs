//! Fixture, check-in and review endpoints.
//!
//! ```text
//! GET  /matches?status=active
//! GET  /matches/{matchId}
//! POST /matches                      {"opponent":"...","date":"2026-04-12","time":"14:00",
//!                                     "venue":"..."}
//! PUT  /matches/{matchId}            {"status":"cancelled"}
//! PUT  /matches/{matchId}/checkin    {"checkedIn":true}
//! GET  /matches/{matchId}/checkin
//! GET  /matches/{matchId}/checkins
//! POST /matches/{matchId}/reviews    {"rating":5,"comment":"..."}
//! GET  /matches/{matchId}/reviews
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CheckIn, CheckInSummary, Error, Match, MatchDraft, MatchId, MatchPatch, MatchStatus, Review,
    ReviewDraft, ReviewSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, AuthenticatedUser};
use crate::inbound::http::state::HttpState;

/// Query for `GET /matches`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MatchListQuery {
    /// Only return fixtures in this state.
    pub status: Option<MatchStatus>,
}

/// Body for `POST /matches`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    #[schema(example = "Kataller Toyama")]
    pub opponent: String,
    #[schema(example = "2026-04-12")]
    pub date: String,
    #[schema(example = "14:00")]
    pub time: String,
    #[schema(example = "Mikuni World Stadium Kitakyushu")]
    pub venue: String,
}

impl TryFrom<CreateMatchRequest> for MatchDraft {
    type Error = Error;

    fn try_from(value: CreateMatchRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.opponent, &value.date, &value.time, &value.venue)
    }
}

/// Body for `PUT /matches/{matchId}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchRequest {
    pub opponent: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub status: Option<MatchStatus>,
}

impl TryFrom<UpdateMatchRequest> for MatchPatch {
    type Error = Error;

    fn try_from(value: UpdateMatchRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.opponent.as_deref(),
            value.date.as_deref(),
            value.time.as_deref(),
            value.venue.as_deref(),
            value.status,
        )
    }
}

/// Body for `PUT /matches/{matchId}/checkin`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub checked_in: bool,
}

/// Body for `POST /matches/{matchId}/reviews`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[schema(minimum = 1, maximum = 5, example = 4)]
    pub rating: i64,
    pub comment: Option<String>,
}

impl TryFrom<ReviewRequest> for ReviewDraft {
    type Error = Error;

    fn try_from(value: ReviewRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.rating, value.comment.as_deref())
    }
}

fn match_id(path: web::Path<String>) -> Result<MatchId, Error> {
    MatchId::new(path.into_inner())
}

/// List fixtures ordered by kickoff.
#[utoipa::path(
    get,
    path = "/matches",
    params(MatchListQuery),
    responses(
        (status = 200, description = "Fixtures", body = [Match]),
        (status = 400, description = "Invalid status filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["matches"],
    operation_id = "listMatches"
)]
#[get("/matches")]
pub async fn list_matches(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    query: web::Query<MatchListQuery>,
) -> ApiResult<web::Json<Vec<Match>>> {
    Ok(web::Json(state.matches.list(query.status).await?))
}

#[utoipa::path(
    get,
    path = "/matches/{matchId}",
    params(("matchId" = String, Path, description = "Fixture identifier")),
    responses(
        (status = 200, description = "Fixture", body = Match),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["matches"],
    operation_id = "getMatch"
)]
#[get("/matches/{match_id}")]
pub async fn get_match(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Match>> {
    Ok(web::Json(state.matches.get(&match_id(path)?).await?))
}

/// Add a fixture. Administrators only.
#[utoipa::path(
    post,
    path = "/matches",
    request_body = CreateMatchRequest,
    responses(
        (status = 200, description = "Fixture created", body = Match),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["matches"],
    operation_id = "createMatch"
)]
#[post("/matches")]
pub async fn create_match(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    payload: web::Json<CreateMatchRequest>,
) -> ApiResult<web::Json<Match>> {
    let draft = MatchDraft::try_from(payload.into_inner())?;
    Ok(web::Json(state.matches.create(draft).await?))
}

/// Edit or cancel a fixture. Administrators only.
#[utoipa::path(
    put,
    path = "/matches/{matchId}",
    params(("matchId" = String, Path, description = "Fixture identifier")),
    request_body = UpdateMatchRequest,
    responses(
        (status = 200, description = "Updated fixture", body = Match),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["matches"],
    operation_id = "updateMatch"
)]
#[put("/matches/{match_id}")]
pub async fn update_match(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<UpdateMatchRequest>,
) -> ApiResult<web::Json<Match>> {
    let id = match_id(path)?;
    let patch = MatchPatch::try_from(payload.into_inner())?;
    Ok(web::Json(state.matches.update(&id, patch).await?))
}

/// Record whether the caller is attending.
#[utoipa::path(
    put,
    path = "/matches/{matchId}/checkin",
    params(("matchId" = String, Path, description = "Fixture identifier")),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Check-in recorded", body = CheckIn),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Fixture cancelled", body = Error)
    ),
    tags = ["check-ins"],
    operation_id = "setCheckIn"
)]
#[put("/matches/{match_id}/checkin")]
pub async fn set_check_in(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<CheckInRequest>,
) -> ApiResult<web::Json<CheckIn>> {
    let id = match_id(path)?;
    let record = state
        .matches
        .check_in(&caller, &id, payload.checked_in)
        .await?;
    Ok(web::Json(record))
}

#[utoipa::path(
    get,
    path = "/matches/{matchId}/checkin",
    params(("matchId" = String, Path, description = "Fixture identifier")),
    responses(
        (
            status = 200,
            description = "Caller's check-in, `checkedIn: false` when unset",
            body = CheckIn
        ),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["check-ins"],
    operation_id = "getCheckIn"
)]
#[get("/matches/{match_id}/checkin")]
pub async fn get_check_in(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<CheckIn>> {
    let id = match_id(path)?;
    Ok(web::Json(state.matches.check_in_status(&caller, &id).await?))
}

/// Supporters who have checked in.
#[utoipa::path(
    get,
    path = "/matches/{matchId}/checkins",
    params(("matchId" = String, Path, description = "Fixture identifier")),
    responses(
        (status = 200, description = "Attendance summary", body = CheckInSummary),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["check-ins"],
    operation_id = "listCheckIns"
)]
#[get("/matches/{match_id}/checkins")]
pub async fn list_check_ins(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<CheckInSummary>> {
    let id = match_id(path)?;
    Ok(web::Json(state.matches.attendees(&id).await?))
}

/// Rate a fixture once.
#[utoipa::path(
    post,
    path = "/matches/{matchId}/reviews",
    params(("matchId" = String, Path, description = "Fixture identifier")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review posted", body = Review),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already reviewed", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "addReview"
)]
#[post("/matches/{match_id}/reviews")]
pub async fn add_review(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<Review>> {
    let id = match_id(path)?;
    let draft = ReviewDraft::try_from(payload.into_inner())?;
    Ok(web::Json(state.matches.add_review(&caller, &id, draft).await?))
}

#[utoipa::path(
    get,
    path = "/matches/{matchId}/reviews",
    params(("matchId" = String, Path, description = "Fixture identifier")),
    responses(
        (
            status = 200,
            description = "Reviews, newest first, with the average rating",
            body = ReviewSummary
        ),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listReviews"
)]
#[get("/matches/{match_id}/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReviewSummary>> {
    let id = match_id(path)?;
    Ok(web::Json(state.matches.reviews(&id).await?))
}
