//! DynamoDB implementations of the persistence ports.
//!
//! | Port | Table | Key | Index used |
//! | --- | --- | --- | --- |
//! | users | `<prefix>-users` | `userId` | |
//! | matches | `<prefix>-matches` | `matchId` | |
//! | check-ins | `<prefix>-checkins` | `matchId` + `userId` | |
//! | reviews | `<prefix>-reviews` | `reviewId` | `matchId-index` |
//! | reports | `<prefix>-reports` | `reportId` | |
//! | recruitments | `<prefix>-recruitments` | `recruitmentId` | `recruiterId-index` |
//! | requests | `<prefix>-requests` | `requestId` | `requesterId-index`, `recruiterId-index` |
//! | chats | `<prefix>-chats` | `chatId` | |
//! | messages | `<prefix>-messages` | `chatId` + `messageId` | |
//! | restaurants | `<prefix>-restaurants` | `restaurantId` | |

use async_trait::async_trait;

use crate::domain::ports::{
    ChatRepository, CheckInRepository, MatchRepository, MessageRepository, RecruitmentRepository,
    ReportRepository, RepositoryError, RequestRepository, RestaurantRepository, ReviewRepository,
    UserRepository,
};
use crate::domain::{
    Chat, ChatId, CheckIn, Match, MatchId, Message, Recruitment, RecruitmentId, RecruitmentRequest,
    Report, ReportId, RequestId, Restaurant, RestaurantId, Review, User, UserId,
};

use super::table::{DynamoTable, key};

pub const MATCH_ID_INDEX: &str = "matchId-index";
pub const RECRUITER_ID_INDEX: &str = "recruiterId-index";
pub const REQUESTER_ID_INDEX: &str = "requesterId-index";

pub struct DynamoUserRepository(pub(crate) DynamoTable);

#[async_trait]
impl UserRepository for DynamoUserRepository {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        self.0.put_new(user, "userId", user.user_id.as_ref()).await
    }

    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        self.0.put(user).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.0.get(key(&[("userId", id.as_ref())])).await
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.0.scan().await
    }
}

pub struct DynamoMatchRepository(pub(crate) DynamoTable);

#[async_trait]
impl MatchRepository for DynamoMatchRepository {
    async fn save(&self, fixture: &Match) -> Result<(), RepositoryError> {
        self.0.put(fixture).await
    }

    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, RepositoryError> {
        self.0.get(key(&[("matchId", id.as_ref())])).await
    }

    async fn list(&self) -> Result<Vec<Match>, RepositoryError> {
        self.0.scan().await
    }
}

pub struct DynamoCheckInRepository(pub(crate) DynamoTable);

#[async_trait]
impl CheckInRepository for DynamoCheckInRepository {
    async fn save(&self, check_in: &CheckIn) -> Result<(), RepositoryError> {
        self.0.put(check_in).await
    }

    async fn find(
        &self,
        match_id: &MatchId,
        user_id: &UserId,
    ) -> Result<Option<CheckIn>, RepositoryError> {
        self.0
            .get(key(&[("matchId", match_id.as_ref()), ("userId", user_id.as_ref())]))
            .await
    }

    async fn list_for_match(&self, match_id: &MatchId) -> Result<Vec<CheckIn>, RepositoryError> {
        self.0.query_eq(None, "matchId", match_id.as_ref()).await
    }
}

pub struct DynamoReviewRepository(pub(crate) DynamoTable);

#[async_trait]
impl ReviewRepository for DynamoReviewRepository {
    async fn create(&self, review: &Review) -> Result<(), RepositoryError> {
        self.0
            .put_new(review, "reviewId", review.review_id.as_ref())
            .await
    }

    async fn list_for_match(&self, match_id: &MatchId) -> Result<Vec<Review>, RepositoryError> {
        self.0
            .query_eq(Some(MATCH_ID_INDEX), "matchId", match_id.as_ref())
            .await
    }

    async fn list(&self) -> Result<Vec<Review>, RepositoryError> {
        self.0.scan().await
    }
}

pub struct DynamoReportRepository(pub(crate) DynamoTable);

#[async_trait]
impl ReportRepository for DynamoReportRepository {
    async fn save(&self, report: &Report) -> Result<(), RepositoryError> {
        self.0.put(report).await
    }

    async fn find_by_id(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError> {
        self.0.get(key(&[("reportId", id.as_ref())])).await
    }

    async fn list(&self) -> Result<Vec<Report>, RepositoryError> {
        self.0.scan().await
    }
}

pub struct DynamoRecruitmentRepository(pub(crate) DynamoTable);

#[async_trait]
impl RecruitmentRepository for DynamoRecruitmentRepository {
    async fn save(&self, recruitment: &Recruitment) -> Result<(), RepositoryError> {
        self.0.put(recruitment).await
    }

    async fn find_by_id(&self, id: &RecruitmentId) -> Result<Option<Recruitment>, RepositoryError> {
        self.0.get(key(&[("recruitmentId", id.as_ref())])).await
    }

    async fn list(&self) -> Result<Vec<Recruitment>, RepositoryError> {
        self.0.scan().await
    }

    async fn list_by_recruiter(
        &self,
        recruiter_id: &UserId,
    ) -> Result<Vec<Recruitment>, RepositoryError> {
        self.0
            .query_eq(Some(RECRUITER_ID_INDEX), "recruiterId", recruiter_id.as_ref())
            .await
    }
}

pub struct DynamoRequestRepository(pub(crate) DynamoTable);

#[async_trait]
impl RequestRepository for DynamoRequestRepository {
    async fn save(&self, request: &RecruitmentRequest) -> Result<(), RepositoryError> {
        self.0.put(request).await
    }

    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<RecruitmentRequest>, RepositoryError> {
        self.0.get(key(&[("requestId", id.as_ref())])).await
    }

    async fn list_by_requester(
        &self,
        requester_id: &UserId,
    ) -> Result<Vec<RecruitmentRequest>, RepositoryError> {
        self.0
            .query_eq(Some(REQUESTER_ID_INDEX), "requesterId", requester_id.as_ref())
            .await
    }

    async fn list_by_recruiter(
        &self,
        recruiter_id: &UserId,
    ) -> Result<Vec<RecruitmentRequest>, RepositoryError> {
        self.0
            .query_eq(Some(RECRUITER_ID_INDEX), "recruiterId", recruiter_id.as_ref())
            .await
    }
}

pub struct DynamoChatRepository(pub(crate) DynamoTable);

#[async_trait]
impl ChatRepository for DynamoChatRepository {
    async fn save(&self, chat: &Chat) -> Result<(), RepositoryError> {
        self.0.put(chat).await
    }

    async fn find_by_id(&self, id: &ChatId) -> Result<Option<Chat>, RepositoryError> {
        self.0.get(key(&[("chatId", id.as_ref())])).await
    }

    async fn list(&self) -> Result<Vec<Chat>, RepositoryError> {
        self.0.scan().await
    }
}

pub struct DynamoMessageRepository(pub(crate) DynamoTable);

#[async_trait]
impl MessageRepository for DynamoMessageRepository {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        self.0.put(message).await
    }

    async fn list_for_chat(&self, chat_id: &ChatId) -> Result<Vec<Message>, RepositoryError> {
        // Query results come back in sort-key order, which is send order.
        self.0.query_eq(None, "chatId", chat_id.as_ref()).await
    }
}

pub struct DynamoRestaurantRepository(pub(crate) DynamoTable);

#[async_trait]
impl RestaurantRepository for DynamoRestaurantRepository {
    async fn save(&self, restaurant: &Restaurant) -> Result<(), RepositoryError> {
        self.0.put(restaurant).await
    }

    async fn find_by_id(&self, id: &RestaurantId) -> Result<Option<Restaurant>, RepositoryError> {
        self.0.get(key(&[("restaurantId", id.as_ref())])).await
    }

    async fn list(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        self.0.scan().await
    }

    async fn delete(&self, id: &RestaurantId) -> Result<bool, RepositoryError> {
        self.0.delete(key(&[("restaurantId", id.as_ref())])).await
    }
}
