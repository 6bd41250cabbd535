//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP handler and the schemas they exchange. The
//! document is served by Swagger UI in debug builds and printed by the
//! `openapi-dump` binary for client generation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::moderation_service::{
    MatchStats, RecruitmentStats, ReportStats, ReviewStats, UserStats,
};
use crate::domain::{
    AccessToken, AdminStats, Chat, ChatView, CheckIn, CheckInSummary, Error, ErrorCode,
    LoginOutcome, Match, MatchStatus, Message, Recruitment, RecruitmentRequest, RecruitmentStatus,
    Report, ReportStatus, RequestStatus, Restaurant, Review, ReviewSummary, UserProfile,
};
use crate::inbound::http::{admin, chats, health, matches, matching, reports, restaurants, users};

/// Name of the bearer security scheme referenced by every protected path.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Registers the JWT bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Giravent backend API",
        description = "Supporter accounts, fixtures, check-ins, reviews, watch-together \
                       matching, post-match chat and the restaurant guide."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        users::register,
        users::get_user,
        users::update_user,
        users::change_password,
        users::delete_user,
        users::login,
        users::current_user,
        matches::list_matches,
        matches::get_match,
        matches::create_match,
        matches::update_match,
        matches::set_check_in,
        matches::get_check_in,
        matches::list_check_ins,
        matches::add_review,
        matches::list_reviews,
        matching::create_recruitment,
        matching::list_recruitments,
        matching::my_recruitments,
        matching::get_recruitment,
        matching::change_recruitment_status,
        matching::send_request,
        matching::sent_requests,
        matching::received_requests,
        matching::respond_to_request,
        matching::cancel_request,
        chats::create_chat,
        chats::list_chats,
        chats::get_chat,
        chats::list_messages,
        chats::post_message,
        reports::file_report,
        restaurants::list_restaurants,
        restaurants::get_restaurant,
        restaurants::create_restaurant,
        restaurants::update_restaurant,
        restaurants::delete_restaurant,
        admin::stats,
        admin::list_users,
        admin::set_suspension,
        admin::set_role,
        admin::list_reports,
        admin::resolve_report,
        health::ready,
        health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserProfile,
        AccessToken,
        LoginOutcome,
        Match,
        MatchStatus,
        CheckIn,
        CheckInSummary,
        Review,
        ReviewSummary,
        Recruitment,
        RecruitmentStatus,
        RecruitmentRequest,
        RequestStatus,
        Chat,
        ChatView,
        Message,
        Report,
        ReportStatus,
        Restaurant,
        AdminStats,
        UserStats,
        MatchStats,
        RecruitmentStats,
        ReportStats,
        ReviewStats,
    )),
    tags(
        (name = "users", description = "Supporter accounts"),
        (name = "auth", description = "Login and the current session"),
        (name = "matches", description = "Club fixtures"),
        (name = "check-ins", description = "Stadium attendance"),
        (name = "reviews", description = "Match ratings"),
        (name = "matching", description = "Watch-together recruitments and join requests"),
        (name = "chats", description = "Post-match chat rooms"),
        (name = "reports", description = "Reports about other supporters"),
        (name = "restaurants", description = "Restaurant guide"),
        (name = "admin", description = "Administrator tools"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Structural checks on the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.contains_key(field),
            _ => false,
        }
    }

    #[rstest]
    #[case("Error", "error")]
    #[case("Error", "code")]
    #[case("UserProfile", "userId")]
    #[case("Match", "matchId")]
    #[case("Recruitment", "approvedCount")]
    fn schemas_use_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert!(object_has_field(found, field), "{schema} should have {field}");
    }

    #[rstest]
    #[case("/users")]
    #[case("/auth/login")]
    #[case("/matching/recruitments/mine")]
    #[case("/chats/{chatId}/messages")]
    #[case("/admin/reports/{reportId}")]
    #[case("/health/ready")]
    fn paths_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }
}
