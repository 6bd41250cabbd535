//! Supporter reports about other supporters, triaged by administrators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{ChatId, ReportId};
use super::user::UserId;
use super::validation::{bounded_text, optional_text};
use super::Error;

const REASON_MAX: usize = 500;
const REFERENCE_MAX: usize = 200;

/// Moderation state of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    /// Only `resolved` and `dismissed` close a report.
    pub fn ensure_terminal(self) -> Result<Self, Error> {
        match self {
            Self::Resolved | Self::Dismissed => Ok(self),
            Self::Pending => Err(Error::invalid_request(
                "status must be resolved or dismissed",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[schema(value_type = String)]
    pub report_id: ReportId,
    #[schema(value_type = String)]
    pub reporter_id: UserId,
    #[schema(value_type = String)]
    pub target_user_id: UserId,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub chat_id: Option<ChatId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated report input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub target_user_id: UserId,
    pub reason: String,
    pub chat_id: Option<ChatId>,
    pub message_id: Option<String>,
}

impl ReportDraft {
    pub fn try_from_parts(
        target_user_id: &str,
        reason: &str,
        chat_id: Option<&str>,
        message_id: Option<&str>,
    ) -> Result<Self, Error> {
        let chat_id = optional_text("chatId", chat_id, REFERENCE_MAX)?
            .map(ChatId::new)
            .transpose()?;
        Ok(Self {
            target_user_id: UserId::new(target_user_id.trim())?,
            reason: bounded_text("reason", reason, 1, REASON_MAX)?,
            chat_id,
            message_id: optional_text("messageId", message_id, REFERENCE_MAX)?,
        })
    }

    /// File the report as pending. Reporting oneself is refused.
    pub fn file(self, reporter_id: UserId, now: DateTime<Utc>) -> Result<Report, Error> {
        if reporter_id == self.target_user_id {
            return Err(Error::invalid_request("you cannot report yourself"));
        }
        Ok(Report {
            report_id: ReportId::random(),
            reporter_id,
            target_user_id: self.target_user_id,
            reason: self.reason,
            chat_id: self.chat_id,
            message_id: self.message_id,
            status: ReportStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn self_reports_are_refused() {
        let draft = ReportDraft::try_from_parts("giran_fan", "spam", None, None).expect("valid");
        let error = draft
            .file(UserId::new("giran_fan").expect("id"), Utc::now())
            .expect_err("self report");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn blank_references_are_dropped() {
        let draft =
            ReportDraft::try_from_parts("other_fan", "abuse in chat", Some(" "), Some(""))
                .expect("valid");
        assert!(draft.chat_id.is_none());
        assert!(draft.message_id.is_none());
    }

    #[rstest]
    #[case(ReportStatus::Resolved, true)]
    #[case(ReportStatus::Dismissed, true)]
    #[case(ReportStatus::Pending, false)]
    fn only_terminal_statuses_close_reports(#[case] status: ReportStatus, #[case] ok: bool) {
        assert_eq!(status.ensure_terminal().is_ok(), ok);
    }
}
