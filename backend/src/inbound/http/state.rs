//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only talk to domain
//! services, so they can be exercised without real infrastructure.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{PasswordHasher, TokenService};
use crate::domain::{
    AccountService, ChatService, MatchService, MatchingService, ModerationService,
    RestaurantService,
};
use crate::outbound::Repositories;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub matches: MatchService,
    pub matching: MatchingService,
    pub chats: ChatService,
    pub moderation: ModerationService,
    pub restaurants: RestaurantService,
}

/// Non-storage ports the services need besides the repositories.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Build every service over one set of repositories.
    pub fn new(repos: &Repositories, ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            hasher,
            tokens,
            clock,
        } = ports;
        Self {
            accounts: AccountService::new(repos.users.clone(), hasher, tokens, clock.clone()),
            matches: MatchService::new(
                repos.matches.clone(),
                repos.check_ins.clone(),
                repos.reviews.clone(),
                clock.clone(),
            ),
            matching: MatchingService::new(
                repos.matches.clone(),
                repos.recruitments.clone(),
                repos.requests.clone(),
                clock.clone(),
            ),
            chats: ChatService::new(
                repos.matches.clone(),
                repos.chats.clone(),
                repos.messages.clone(),
                clock.clone(),
            ),
            moderation: ModerationService::new(
                repos.users.clone(),
                repos.matches.clone(),
                repos.recruitments.clone(),
                repos.reviews.clone(),
                repos.reports.clone(),
                clock.clone(),
            ),
            restaurants: RestaurantService::new(repos.restaurants.clone(), clock),
        }
    }
}
