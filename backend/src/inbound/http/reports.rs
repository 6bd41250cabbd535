//! Supporter reports about other supporters.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Report, ReportDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body for `POST /reports`. `chatId` and `messageId` point at the offending
/// chat message when there is one.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileReportRequest {
    pub target_user_id: String,
    #[schema(example = "Abusive messages in the match chat")]
    pub reason: String,
    pub chat_id: Option<String>,
    pub message_id: Option<String>,
}

impl TryFrom<FileReportRequest> for ReportDraft {
    type Error = Error;

    fn try_from(value: FileReportRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.target_user_id,
            &value.reason,
            value.chat_id.as_deref(),
            value.message_id.as_deref(),
        )
    }
}

#[utoipa::path(
    post,
    path = "/reports",
    request_body = FileReportRequest,
    responses(
        (status = 200, description = "Pending report", body = Report),
        (status = 400, description = "Invalid request or self-report", body = Error),
        (status = 404, description = "Target user not found", body = Error)
    ),
    tags = ["reports"],
    operation_id = "fileReport"
)]
#[post("/reports")]
pub async fn file_report(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<FileReportRequest>,
) -> ApiResult<web::Json<Report>> {
    let draft = ReportDraft::try_from(payload.into_inner())?;
    Ok(web::Json(state.moderation.file_report(&caller, draft).await?))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test::TestRequest;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::test_support::{TestBackend, fixture_user};

    #[rstest]
    #[case::pending("rival_fan", StatusCode::OK)]
    #[case::self_report("giran_fan", StatusCode::BAD_REQUEST)]
    #[case::unknown_target("ghost_fan", StatusCode::NOT_FOUND)]
    #[case::deleted_target("gone_fan", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn filing_reports(#[case] target: &str, #[case] expected: StatusCode) {
        let backend = TestBackend::new();
        let reporter = fixture_user("giran_fan");
        backend.seed_user(&reporter).await;
        backend.seed_user(&fixture_user("rival_fan")).await;
        let mut gone = fixture_user("gone_fan");
        gone.deleted = true;
        backend.seed_user(&gone).await;

        let (status, body) = backend
            .call(
                TestRequest::post()
                    .uri("/reports")
                    .insert_header((AUTHORIZATION, backend.bearer(&reporter)))
                    .set_json(json!({"targetUserId": target, "reason": "Spam"})),
            )
            .await;

        assert_eq!(status, expected);
        if expected == StatusCode::OK {
            assert_eq!(body.get("status").and_then(Value::as_str), Some("pending"));
            assert_eq!(
                body.get("reporterId").and_then(Value::as_str),
                Some("giran_fan")
            );
        }
    }
}
