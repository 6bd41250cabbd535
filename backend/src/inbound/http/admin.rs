//! Administrator endpoints.
//!
//! Every handler takes [`AdminUser`], so callers without the stored admin
//! flag receive 403 before any work is done.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{AdminStats, Error, Report, ReportId, ReportStatus, UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminUser;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SuspensionRequest {
    pub suspended: bool,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    pub is_admin: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportListQuery {
    pub status: Option<ReportStatus>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ResolveReportRequest {
    /// `resolved` or `dismissed`.
    pub status: ReportStatus,
}

/// Dashboard counts.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Counts", body = AdminStats),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminStats"
)]
#[get("/admin/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    _admin: AdminUser,
) -> ApiResult<web::Json<AdminStats>> {
    Ok(web::Json(state.moderation.stats().await?))
}

/// Every account, deleted ones included, sorted by `userId`.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "Accounts", body = [UserProfile]),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _admin: AdminUser,
) -> ApiResult<web::Json<Vec<UserProfile>>> {
    Ok(web::Json(state.accounts.list_all().await?))
}

#[utoipa::path(
    put,
    path = "/admin/users/{userId}/suspension",
    params(("userId" = String, Path, description = "Account identifier")),
    request_body = SuspensionRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSetSuspension"
)]
#[put("/admin/users/{user_id}/suspension")]
pub async fn set_suspension(
    state: web::Data<HttpState>,
    admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<SuspensionRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let user_id = UserId::new(path.into_inner())?;
    let profile = state
        .accounts
        .set_suspended(&admin, &user_id, payload.suspended)
        .await?;
    Ok(web::Json(profile))
}

/// Grant or revoke the admin flag. Revoking one's own flag is refused.
#[utoipa::path(
    put,
    path = "/admin/users/{userId}/role",
    params(("userId" = String, Path, description = "Account identifier")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Self-demotion", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSetRole"
)]
#[put("/admin/users/{user_id}/role")]
pub async fn set_role(
    state: web::Data<HttpState>,
    admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<RoleRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let user_id = UserId::new(path.into_inner())?;
    let profile = state
        .accounts
        .set_admin(&admin, &user_id, payload.is_admin)
        .await?;
    Ok(web::Json(profile))
}

#[utoipa::path(
    get,
    path = "/admin/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Reports, newest first", body = [Report]),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListReports"
)]
#[get("/admin/reports")]
pub async fn list_reports(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    query: web::Query<ReportListQuery>,
) -> ApiResult<web::Json<Vec<Report>>> {
    Ok(web::Json(state.moderation.list_reports(query.status).await?))
}

#[utoipa::path(
    put,
    path = "/admin/reports/{reportId}",
    params(("reportId" = String, Path, description = "Report identifier")),
    request_body = ResolveReportRequest,
    responses(
        (status = 200, description = "Closed report", body = Report),
        (status = 400, description = "Status must be resolved or dismissed", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminResolveReport"
)]
#[put("/admin/reports/{report_id}")]
pub async fn resolve_report(
    state: web::Data<HttpState>,
    admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<ResolveReportRequest>,
) -> ApiResult<web::Json<Report>> {
    let report_id = ReportId::new(path.into_inner())?;
    let report = state
        .moderation
        .resolve_report(&admin, &report_id, payload.status)
        .await?;
    Ok(web::Json(report))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
