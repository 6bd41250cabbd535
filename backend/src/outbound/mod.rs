//! Outbound adapters implementing domain ports.
//!
//! - **dynamodb**: one table per record kind, mapped with `serde_dynamo`.
//! - **memory**: process-local maps for development and tests.
//! - **security**: bcrypt password hashing and HS256 bearer tokens.
//!
//! Adapters translate between domain records and their stored form; they hold
//! no business rules.

use std::sync::Arc;

use crate::domain::ports::{
    ChatRepository, CheckInRepository, MatchRepository, MessageRepository, RecruitmentRepository,
    ReportRepository, RequestRepository, RestaurantRepository, ReviewRepository, UserRepository,
};

pub mod dynamodb;
pub mod memory;
pub mod security;

/// Every persistence port, wired to one storage backend.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub matches: Arc<dyn MatchRepository>,
    pub check_ins: Arc<dyn CheckInRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub recruitments: Arc<dyn RecruitmentRepository>,
    pub requests: Arc<dyn RequestRepository>,
    pub chats: Arc<dyn ChatRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub restaurants: Arc<dyn RestaurantRepository>,
}
