//! Process-local storage.
//!
//! Mirrors the DynamoDB adapter's observable behaviour: create-if-absent
//! writes report [`RepositoryError::AlreadyExists`](crate::domain::ports::RepositoryError),
//! index lookups match on a single attribute and messages come back in
//! `messageId` order. Data lives for the life of the process.

mod repositories;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{
    Chat, ChatId, CheckIn, Match, MatchId, Message, MessageId, Recruitment, RecruitmentId,
    RecruitmentRequest, Report, ReportId, RequestId, Restaurant, RestaurantId, Review, ReviewId,
    User, UserId,
};

use super::Repositories;

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    matches: BTreeMap<MatchId, Match>,
    check_ins: BTreeMap<(MatchId, UserId), CheckIn>,
    reviews: BTreeMap<ReviewId, Review>,
    reports: BTreeMap<ReportId, Report>,
    recruitments: BTreeMap<RecruitmentId, Recruitment>,
    requests: BTreeMap<RequestId, RecruitmentRequest>,
    chats: BTreeMap<ChatId, Chat>,
    messages: BTreeMap<(ChatId, MessageId), Message>,
    restaurants: BTreeMap<RestaurantId, Restaurant>,
}

/// All tables behind one mutex, held for a single operation at a time.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire every repository port to this store.
    #[must_use]
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            matches: self.clone(),
            check_ins: self.clone(),
            reviews: self.clone(),
            reports: self.clone(),
            recruitments: self.clone(),
            requests: self.clone(),
            chats: self.clone(),
            messages: self.clone(),
            restaurants: self.clone(),
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock cannot leave a map half-written, so
        // the data is still usable.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
