//! Post-match chat rooms.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::chat::latest_messages;
use crate::domain::ports::{ChatRepository, MatchRepository, MessageRepository};
use crate::domain::{ChatDraft, ChatId, ChatView, Error, MatchId, Message, User};

#[derive(Clone)]
pub struct ChatService {
    matches: Arc<dyn MatchRepository>,
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
}

impl ChatService {
    pub fn new(
        matches: Arc<dyn MatchRepository>,
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            matches,
            chats,
            messages,
            clock,
        }
    }

    pub async fn create_chat(
        &self,
        match_id: &MatchId,
        draft: ChatDraft,
    ) -> Result<ChatView, Error> {
        let fixture = self
            .matches
            .find_by_id(match_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("match {match_id} not found")))?;
        let now = self.clock.utc();
        let chat = draft.into_chat(&fixture, now)?;
        self.chats.save(&chat).await?;
        info!(
            chat_id = %chat.chat_id,
            match_id = %chat.match_id,
            closes_at = %chat.closes_at,
            "chat opened"
        );
        Ok(chat.view(now))
    }

    /// Chats newest first, optionally for one match.
    pub async fn list_chats(&self, match_id: Option<&MatchId>) -> Result<Vec<ChatView>, Error> {
        let now = self.clock.utc();
        let mut chats: Vec<_> = self
            .chats
            .list()
            .await?
            .into_iter()
            .filter(|chat| match_id.is_none_or(|id| &chat.match_id == id))
            .collect();
        chats.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.chat_id.cmp(&b.chat_id))
        });
        Ok(chats.into_iter().map(|chat| chat.view(now)).collect())
    }

    pub async fn get_chat(&self, chat_id: &ChatId) -> Result<ChatView, Error> {
        let chat = self
            .chats
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("chat {chat_id} not found")))?;
        Ok(chat.view(self.clock.utc()))
    }

    /// The `limit` most recent messages, oldest first.
    pub async fn messages(&self, chat_id: &ChatId, limit: usize) -> Result<Vec<Message>, Error> {
        self.get_chat(chat_id).await?;
        let messages = self.messages.list_for_chat(chat_id).await?;
        Ok(latest_messages(messages, limit))
    }

    pub async fn post_message(
        &self,
        actor: &User,
        chat_id: &ChatId,
        text: &str,
    ) -> Result<Message, Error> {
        let now = self.clock.utc();
        let chat = self.get_chat(chat_id).await?.chat;
        let message = Message::compose(
            chat.chat_id.clone(),
            actor.user_id.clone(),
            actor.name.clone(),
            text,
            now,
        )?;
        chat.ensure_open(now)?;
        self.messages.append(&message).await?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockChatRepository, MockMatchRepository, MockMessageRepository};
    use crate::domain::{Chat, ErrorCode, MatchDraft};
    use crate::test_support::{MutableClock, fixture_timestamp, fixture_user};
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    #[fixture]
    fn chat() -> Chat {
        Chat {
            chat_id: ChatId::new("c1").expect("id"),
            match_id: MatchId::new("m1").expect("id"),
            name: "vs Toyama".to_owned(),
            closes_at: fixture_timestamp() + TimeDelta::hours(2),
            created_at: fixture_timestamp(),
        }
    }

    fn service_with(
        matches: MockMatchRepository,
        chats: MockChatRepository,
        messages: MockMessageRepository,
        clock: Arc<MutableClock>,
    ) -> ChatService {
        ChatService::new(Arc::new(matches), Arc::new(chats), Arc::new(messages), clock)
    }

    fn chats_returning(chat: Chat) -> MockChatRepository {
        let mut chats = MockChatRepository::new();
        chats
            .expect_find_by_id()
            .returning(move |_| Ok(Some(chat.clone())));
        chats
    }

    #[rstest]
    #[tokio::test]
    async fn messages_to_closed_chats_are_refused(chat: Chat) {
        let clock = Arc::new(MutableClock::new(fixture_timestamp()));
        clock.advance(TimeDelta::hours(3));
        let mut messages = MockMessageRepository::new();
        messages.expect_append().never();
        let service = service_with(
            MockMatchRepository::new(),
            chats_returning(chat),
            messages,
            clock,
        );
        let error = service
            .post_message(&fixture_user("giran_fan"), &ChatId::new("c1").expect("id"), "hello")
            .await
            .expect_err("closed");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn messages_carry_the_author_name(chat: Chat) {
        let mut messages = MockMessageRepository::new();
        messages.expect_append().times(1).returning(|_| Ok(()));
        let service = service_with(
            MockMatchRepository::new(),
            chats_returning(chat),
            messages,
            Arc::new(MutableClock::new(fixture_timestamp())),
        );
        let message = service
            .post_message(&fixture_user("giran_fan"), &ChatId::new("c1").expect("id"), " Goal! ")
            .await
            .expect("posted");
        assert_eq!(message.text, "Goal!");
        assert_eq!(message.user_name, "giran_fan name");
    }

    #[rstest]
    #[tokio::test]
    async fn view_reflects_the_clock(chat: Chat) {
        let clock = Arc::new(MutableClock::new(fixture_timestamp()));
        let service = service_with(
            MockMatchRepository::new(),
            chats_returning(chat),
            MockMessageRepository::new(),
            Arc::clone(&clock),
        );
        let id = ChatId::new("c1").expect("id");
        assert!(service.get_chat(&id).await.expect("chat").open);
        clock.advance(TimeDelta::hours(2));
        assert!(!service.get_chat(&id).await.expect("chat").open);
    }

    #[tokio::test]
    async fn chats_default_their_name_from_the_match() {
        let mut matches = MockMatchRepository::new();
        matches.expect_find_by_id().returning(|_| {
            Ok(Some(
                MatchDraft::try_from_parts("Kataller Toyama", "2026-04-12", "14:00", "Mikuni")
                    .expect("draft")
                    .into_match(fixture_timestamp()),
            ))
        });
        let mut chats = MockChatRepository::new();
        chats.expect_save().times(1).returning(|_| Ok(()));
        let service = service_with(
            matches,
            chats,
            MockMessageRepository::new(),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );
        let view = service
            .create_chat(
                &MatchId::new("m1").expect("id"),
                ChatDraft::try_from_parts(None, None).expect("draft"),
            )
            .await
            .expect("created");
        assert_eq!(view.chat.name, "vs Kataller Toyama");
        assert!(view.open);
    }
}
