//! Ports for chat rooms and their message log.

use async_trait::async_trait;

use crate::domain::{Chat, ChatId, Message};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn save(&self, chat: &Chat) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &ChatId) -> Result<Option<Chat>, RepositoryError>;

    async fn list(&self) -> Result<Vec<Chat>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError>;

    /// Messages of one chat ordered by message id, oldest first.
    async fn list_for_chat(&self, chat_id: &ChatId) -> Result<Vec<Message>, RepositoryError>;
}
