//! Domain ports: the traits outbound adapters implement.

mod macros;
pub(crate) use macros::define_port_error;

mod checkin_repository;
mod chat_repository;
mod match_repository;
mod password_hasher;
mod recruitment_repository;
mod report_repository;
mod repository_error;
mod restaurant_repository;
mod review_repository;
mod token_service;
mod user_repository;

pub use checkin_repository::CheckInRepository;
#[cfg(test)]
pub use checkin_repository::MockCheckInRepository;
pub use chat_repository::{ChatRepository, MessageRepository};
#[cfg(test)]
pub use chat_repository::{MockChatRepository, MockMessageRepository};
pub use match_repository::MatchRepository;
#[cfg(test)]
pub use match_repository::MockMatchRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use recruitment_repository::{MockRecruitmentRepository, MockRequestRepository};
pub use recruitment_repository::{RecruitmentRepository, RequestRepository};
#[cfg(test)]
pub use report_repository::MockReportRepository;
pub use report_repository::ReportRepository;
pub use repository_error::RepositoryError;
#[cfg(test)]
pub use restaurant_repository::MockRestaurantRepository;
pub use restaurant_repository::RestaurantRepository;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::ReviewRepository;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
