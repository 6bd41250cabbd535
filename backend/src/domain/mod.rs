//! Domain entities, ports and services.
//!
//! Entities are plain serde records; the same camelCase layout is used on the
//! wire and for stored items. Constructors named `try_from_parts` validate raw
//! input and fail with `invalid_request` errors naming the offending field.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - Entities: User, Match, CheckIn, Review, Report, Recruitment,
//!   RecruitmentRequest, Chat, Message, Restaurant.
//! - Services: AccountService, MatchService, MatchingService, ChatService,
//!   ModerationService, RestaurantService.

pub mod account_service;
pub mod auth;
pub mod chat;
pub mod chat_service;
pub mod checkin;
pub mod error;
pub mod ids;
pub mod match_service;
pub mod matches;
pub mod matching_service;
pub mod moderation_service;
pub mod ports;
pub mod recruitment;
pub mod report;
pub mod restaurant;
pub mod restaurant_service;
pub mod review;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::account_service::{AccountService, BootstrapAdmin, LoginOutcome};
pub use self::auth::{AccessToken, LoginCredentials, TokenClaims};
pub use self::chat::{Chat, ChatDraft, ChatView, Message, MessageId};
pub use self::chat_service::ChatService;
pub use self::checkin::{CheckIn, CheckInSummary};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{ChatId, MatchId, RecruitmentId, ReportId, RequestId, RestaurantId, ReviewId};
pub use self::match_service::MatchService;
pub use self::matches::{KickoffTime, Match, MatchDraft, MatchPatch, MatchStatus};
pub use self::matching_service::MatchingService;
pub use self::moderation_service::{AdminStats, ModerationService};
pub use self::recruitment::{
    Recruitment, RecruitmentDraft, RecruitmentRequest, RecruitmentStatus, RequestStatus,
};
pub use self::report::{Report, ReportDraft, ReportStatus};
pub use self::restaurant::{Restaurant, RestaurantDraft, RestaurantPatch};
pub use self::restaurant_service::RestaurantService;
pub use self::review::{Review, ReviewDraft, ReviewSummary};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Password, ProfileUpdate, Registration, User, UserId, UserProfile};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use giravent::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
