//! Port implementations for [`InMemoryStore`].

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

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

use super::InMemoryStore;

fn insert_new<K: Ord, V>(
    table: &mut BTreeMap<K, V>,
    key: K,
    value: V,
    label: &str,
) -> Result<(), RepositoryError> {
    match table.entry(key) {
        Entry::Occupied(_) => Err(RepositoryError::already_exists(label)),
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
    }
}

fn select<K, V: Clone>(table: &BTreeMap<K, V>, keep: impl Fn(&V) -> bool) -> Vec<V> {
    table.values().filter(|value| keep(value)).cloned().collect()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        insert_new(
            &mut self.tables().users,
            user.user_id.clone(),
            user.clone(),
            user.user_id.as_ref(),
        )
    }

    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        self.tables().users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables().users.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.tables().users.values().cloned().collect())
    }
}

#[async_trait]
impl MatchRepository for InMemoryStore {
    async fn save(&self, fixture: &Match) -> Result<(), RepositoryError> {
        self.tables()
            .matches
            .insert(fixture.match_id.clone(), fixture.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, RepositoryError> {
        Ok(self.tables().matches.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Match>, RepositoryError> {
        Ok(self.tables().matches.values().cloned().collect())
    }
}

#[async_trait]
impl CheckInRepository for InMemoryStore {
    async fn save(&self, check_in: &CheckIn) -> Result<(), RepositoryError> {
        self.tables().check_ins.insert(
            (check_in.match_id.clone(), check_in.user_id.clone()),
            check_in.clone(),
        );
        Ok(())
    }

    async fn find(
        &self,
        match_id: &MatchId,
        user_id: &UserId,
    ) -> Result<Option<CheckIn>, RepositoryError> {
        Ok(self
            .tables()
            .check_ins
            .get(&(match_id.clone(), user_id.clone()))
            .cloned())
    }

    async fn list_for_match(&self, match_id: &MatchId) -> Result<Vec<CheckIn>, RepositoryError> {
        Ok(select(&self.tables().check_ins, |record| {
            &record.match_id == match_id
        }))
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn create(&self, review: &Review) -> Result<(), RepositoryError> {
        insert_new(
            &mut self.tables().reviews,
            review.review_id.clone(),
            review.clone(),
            review.review_id.as_ref(),
        )
    }

    async fn list_for_match(&self, match_id: &MatchId) -> Result<Vec<Review>, RepositoryError> {
        Ok(select(&self.tables().reviews, |review| {
            &review.match_id == match_id
        }))
    }

    async fn list(&self) -> Result<Vec<Review>, RepositoryError> {
        Ok(self.tables().reviews.values().cloned().collect())
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn save(&self, report: &Report) -> Result<(), RepositoryError> {
        self.tables()
            .reports
            .insert(report.report_id.clone(), report.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError> {
        Ok(self.tables().reports.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Report>, RepositoryError> {
        Ok(self.tables().reports.values().cloned().collect())
    }
}

#[async_trait]
impl RecruitmentRepository for InMemoryStore {
    async fn save(&self, recruitment: &Recruitment) -> Result<(), RepositoryError> {
        self.tables()
            .recruitments
            .insert(recruitment.recruitment_id.clone(), recruitment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &RecruitmentId) -> Result<Option<Recruitment>, RepositoryError> {
        Ok(self.tables().recruitments.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Recruitment>, RepositoryError> {
        Ok(self.tables().recruitments.values().cloned().collect())
    }

    async fn list_by_recruiter(
        &self,
        recruiter_id: &UserId,
    ) -> Result<Vec<Recruitment>, RepositoryError> {
        Ok(select(&self.tables().recruitments, |post| {
            &post.recruiter_id == recruiter_id
        }))
    }
}

#[async_trait]
impl RequestRepository for InMemoryStore {
    async fn save(&self, request: &RecruitmentRequest) -> Result<(), RepositoryError> {
        self.tables()
            .requests
            .insert(request.request_id.clone(), request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<RecruitmentRequest>, RepositoryError> {
        Ok(self.tables().requests.get(id).cloned())
    }

    async fn list_by_requester(
        &self,
        requester_id: &UserId,
    ) -> Result<Vec<RecruitmentRequest>, RepositoryError> {
        Ok(select(&self.tables().requests, |request| {
            &request.requester_id == requester_id
        }))
    }

    async fn list_by_recruiter(
        &self,
        recruiter_id: &UserId,
    ) -> Result<Vec<RecruitmentRequest>, RepositoryError> {
        Ok(select(&self.tables().requests, |request| {
            &request.recruiter_id == recruiter_id
        }))
    }
}

#[async_trait]
impl ChatRepository for InMemoryStore {
    async fn save(&self, chat: &Chat) -> Result<(), RepositoryError> {
        self.tables().chats.insert(chat.chat_id.clone(), chat.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ChatId) -> Result<Option<Chat>, RepositoryError> {
        Ok(self.tables().chats.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Chat>, RepositoryError> {
        Ok(self.tables().chats.values().cloned().collect())
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        self.tables().messages.insert(
            (message.chat_id.clone(), message.message_id.clone()),
            message.clone(),
        );
        Ok(())
    }

    async fn list_for_chat(&self, chat_id: &ChatId) -> Result<Vec<Message>, RepositoryError> {
        // Keys order by chat, then by message id, matching the table's sort key.
        Ok(select(&self.tables().messages, |message| {
            &message.chat_id == chat_id
        }))
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryStore {
    async fn save(&self, restaurant: &Restaurant) -> Result<(), RepositoryError> {
        self.tables()
            .restaurants
            .insert(restaurant.restaurant_id.clone(), restaurant.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &RestaurantId) -> Result<Option<Restaurant>, RepositoryError> {
        Ok(self.tables().restaurants.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        Ok(self.tables().restaurants.values().cloned().collect())
    }

    async fn delete(&self, id: &RestaurantId) -> Result<bool, RepositoryError> {
        Ok(self.tables().restaurants.remove(id).is_some())
    }
}
