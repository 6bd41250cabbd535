//! Reports filed by supporters and the administrator's dashboard figures.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{
    MatchRepository, RecruitmentRepository, ReportRepository, ReviewRepository, UserRepository,
};
use crate::domain::{
    Error, MatchStatus, RecruitmentStatus, Report, ReportDraft, ReportId, ReportStatus, User,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub suspended: usize,
    pub deleted: usize,
    pub admins: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct MatchStats {
    pub total: usize,
    pub active: usize,
    pub cancelled: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RecruitmentStats {
    pub total: usize,
    pub active: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReportStats {
    pub total: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReviewStats {
    pub total: usize,
}

/// Counts shown on the admin dashboard, computed by full scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AdminStats {
    pub users: UserStats,
    pub matches: MatchStats,
    pub recruitments: RecruitmentStats,
    pub reports: ReportStats,
    pub reviews: ReviewStats,
}

#[derive(Clone)]
pub struct ModerationService {
    users: Arc<dyn UserRepository>,
    matches: Arc<dyn MatchRepository>,
    recruitments: Arc<dyn RecruitmentRepository>,
    reviews: Arc<dyn ReviewRepository>,
    reports: Arc<dyn ReportRepository>,
    clock: Arc<dyn Clock>,
}

impl ModerationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        matches: Arc<dyn MatchRepository>,
        recruitments: Arc<dyn RecruitmentRepository>,
        reviews: Arc<dyn ReviewRepository>,
        reports: Arc<dyn ReportRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            matches,
            recruitments,
            reviews,
            reports,
            clock,
        }
    }

    /// File a pending report about another supporter.
    pub async fn file_report(&self, actor: &User, draft: ReportDraft) -> Result<Report, Error> {
        let report = draft.file(actor.user_id.clone(), self.clock.utc())?;
        let target = self.users.find_by_id(&report.target_user_id).await?;
        if target.filter(|user| !user.deleted).is_none() {
            return Err(Error::not_found(format!(
                "user {} not found",
                report.target_user_id
            )));
        }
        self.reports.save(&report).await?;
        info!(
            report_id = %report.report_id,
            reporter_id = %report.reporter_id,
            target_user_id = %report.target_user_id,
            "report filed"
        );
        Ok(report)
    }

    /// Reports newest first, optionally filtered by status.
    pub async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, Error> {
        let mut reports: Vec<Report> = self
            .reports
            .list()
            .await?
            .into_iter()
            .filter(|report| status.is_none_or(|status| report.status == status))
            .collect();
        reports.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.report_id.cmp(&b.report_id))
        });
        Ok(reports)
    }

    pub async fn resolve_report(
        &self,
        actor: &User,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<Report, Error> {
        let status = status.ensure_terminal()?;
        let mut report = self
            .reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("report {id} not found")))?;
        report.status = status;
        report.updated_at = self.clock.utc();
        self.reports.save(&report).await?;
        info!(report_id = %id, actor = %actor.user_id, status = ?status, "report closed");
        Ok(report)
    }

    pub async fn stats(&self) -> Result<AdminStats, Error> {
        let (users, matches, recruitments, reviews, reports) = futures_util::try_join!(
            self.users.list(),
            self.matches.list(),
            self.recruitments.list(),
            self.reviews.list(),
            self.reports.list(),
        )?;
        Ok(AdminStats {
            users: UserStats {
                total: users.len(),
                active: users.iter().filter(|u| u.is_active()).count(),
                suspended: users.iter().filter(|u| u.suspended && !u.deleted).count(),
                deleted: users.iter().filter(|u| u.deleted).count(),
                admins: users.iter().filter(|u| u.is_admin && !u.deleted).count(),
            },
            matches: MatchStats {
                total: matches.len(),
                active: matches
                    .iter()
                    .filter(|m| m.status == MatchStatus::Active)
                    .count(),
                cancelled: matches
                    .iter()
                    .filter(|m| m.status == MatchStatus::Cancelled)
                    .count(),
            },
            recruitments: RecruitmentStats {
                total: recruitments.len(),
                active: recruitments
                    .iter()
                    .filter(|r| r.status == RecruitmentStatus::Active)
                    .count(),
            },
            reports: ReportStats {
                total: reports.len(),
                pending: reports
                    .iter()
                    .filter(|r| r.status == ReportStatus::Pending)
                    .count(),
            },
            reviews: ReviewStats {
                total: reviews.len(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockMatchRepository, MockRecruitmentRepository, MockReportRepository,
        MockReviewRepository, MockUserRepository,
    };
    use crate::domain::{ErrorCode, UserId};
    use crate::test_support::{MutableClock, fixture_admin, fixture_timestamp, fixture_user};

    #[derive(Default)]
    struct Mocks {
        users: MockUserRepository,
        matches: MockMatchRepository,
        recruitments: MockRecruitmentRepository,
        reviews: MockReviewRepository,
        reports: MockReportRepository,
    }

    impl Mocks {
        fn build(self) -> ModerationService {
            ModerationService::new(
                Arc::new(self.users),
                Arc::new(self.matches),
                Arc::new(self.recruitments),
                Arc::new(self.reviews),
                Arc::new(self.reports),
                Arc::new(MutableClock::new(fixture_timestamp())),
            )
        }
    }

    fn report(id: &str, status: ReportStatus, minutes: i64) -> Report {
        Report {
            report_id: ReportId::new(id).expect("id"),
            reporter_id: UserId::new("reporter").expect("id"),
            target_user_id: UserId::new("target").expect("id"),
            reason: "spam".to_owned(),
            chat_id: None,
            message_id: None,
            status,
            created_at: fixture_timestamp() + chrono::TimeDelta::minutes(minutes),
            updated_at: fixture_timestamp(),
        }
    }

    #[tokio::test]
    async fn reports_against_unknown_users_are_not_found() {
        let mut mocks = Mocks::default();
        mocks.users.expect_find_by_id().returning(|_| Ok(None));
        mocks.reports.expect_save().never();
        let draft = ReportDraft::try_from_parts("ghost", "spam", None, None).expect("draft");
        let error = mocks
            .build()
            .file_report(&fixture_user("reporter"), draft)
            .await
            .expect_err("unknown target");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn filed_reports_are_pending() {
        let mut mocks = Mocks::default();
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(fixture_user(id.as_ref()))));
        mocks.reports.expect_save().times(1).returning(|_| Ok(()));
        let draft = ReportDraft::try_from_parts("target", "abusive", Some("c1"), Some("m#1"))
            .expect("draft");
        let report = mocks
            .build()
            .file_report(&fixture_user("reporter"), draft)
            .await
            .expect("filed");
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.message_id.as_deref(), Some("m#1"));
    }

    #[tokio::test]
    async fn list_reports_filters_and_orders_newest_first() {
        let mut mocks = Mocks::default();
        mocks.reports.expect_list().returning(|| {
            Ok(vec![
                report("old", ReportStatus::Pending, 0),
                report("done", ReportStatus::Resolved, 5),
                report("new", ReportStatus::Pending, 10),
            ])
        });
        let reports = mocks
            .build()
            .list_reports(Some(ReportStatus::Pending))
            .await
            .expect("listed");
        let ids: Vec<&str> = reports.iter().map(|r| r.report_id.as_ref()).collect();
        assert_eq!(ids, ["new", "old"]);
    }

    #[tokio::test]
    async fn reports_cannot_be_reopened() {
        let error = Mocks::default()
            .build()
            .resolve_report(
                &fixture_admin("boss"),
                &ReportId::new("r1").expect("id"),
                ReportStatus::Pending,
            )
            .await
            .expect_err("pending is not terminal");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn stats_count_each_category() {
        let mut mocks = Mocks::default();
        mocks.users.expect_list().returning(|| {
            Ok(vec![
                fixture_admin("boss"),
                fixture_user("fan_one"),
                User {
                    suspended: true,
                    ..fixture_user("fan_two")
                },
                User {
                    deleted: true,
                    ..fixture_user("fan_three")
                },
            ])
        });
        mocks.matches.expect_list().returning(|| Ok(Vec::new()));
        mocks.recruitments.expect_list().returning(|| Ok(Vec::new()));
        mocks.reviews.expect_list().returning(|| Ok(Vec::new()));
        mocks.reports.expect_list().returning(|| {
            Ok(vec![
                report("a", ReportStatus::Pending, 0),
                report("b", ReportStatus::Dismissed, 1),
            ])
        });
        let stats = mocks.build().stats().await.expect("stats");
        assert_eq!(
            stats.users,
            UserStats {
                total: 4,
                active: 2,
                suspended: 1,
                deleted: 1,
                admins: 1,
            }
        );
        assert_eq!(stats.reports, ReportStats { total: 2, pending: 1 });
        assert_eq!(stats.matches.total, 0);
    }
}
