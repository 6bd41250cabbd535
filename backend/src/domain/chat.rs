//! Post-match chat rooms and their messages.

use std::fmt;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ids::{ChatId, MatchId};
use super::matches::Match;
use super::user::UserId;
use super::validation::{bounded_text, optional_text};
use super::Error;

const NAME_MAX: usize = 100;
const TEXT_MAX: usize = 500;
/// Messages returned when the client does not ask for a limit.
pub const DEFAULT_MESSAGE_LIMIT: usize = 100;
/// Upper bound on the `limit` query parameter.
pub const MAX_MESSAGE_LIMIT: usize = 500;
/// Chats stay open this long after kickoff unless told otherwise.
pub const DEFAULT_OPEN_HOURS: i64 = 24;

/// A chat room attached to a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[schema(value_type = String)]
    pub chat_id: ChatId,
    #[schema(value_type = String)]
    pub match_id: MatchId,
    #[schema(example = "vs Kataller Toyama")]
    pub name: String,
    pub closes_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        now < self.closes_at
    }

    pub fn ensure_open(&self, now: DateTime<Utc>) -> Result<(), Error> {
        if self.is_open(now) {
            Ok(())
        } else {
            Err(Error::conflict("chat is closed"))
        }
    }

    #[must_use]
    pub fn view(self, now: DateTime<Utc>) -> ChatView {
        let open = self.is_open(now);
        ChatView { chat: self, open }
    }
}

/// Chat as returned to clients, with the computed `open` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChatView {
    #[serde(flatten)]
    pub chat: Chat,
    pub open: bool,
}

/// Validated chat creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDraft {
    pub name: Option<String>,
    pub closes_at: Option<DateTime<Utc>>,
}

impl ChatDraft {
    pub fn try_from_parts(
        name: Option<&str>,
        closes_at: Option<DateTime<Utc>>,
    ) -> Result<Self, Error> {
        Ok(Self {
            name: optional_text("name", name, NAME_MAX)?,
            closes_at,
        })
    }

    /// Fill defaults from the fixture: `vs <opponent>` and kickoff plus a day.
    pub fn into_chat(self, fixture: &Match, now: DateTime<Utc>) -> Result<Chat, Error> {
        let closes_at = match self.closes_at {
            Some(requested) if requested <= now => {
                return Err(Error::invalid_request("closesAt must be in the future"));
            }
            Some(requested) => requested,
            None => {
                let derived = fixture.kickoff() + Duration::hours(DEFAULT_OPEN_HOURS);
                if derived <= now {
                    return Err(Error::invalid_request(
                        "the chat window for this match has already closed; pass closesAt",
                    ));
                }
                derived
            }
        };
        Ok(Chat {
            chat_id: ChatId::random(),
            match_id: fixture.match_id.clone(),
            name: self
                .name
                .unwrap_or_else(|| format!("vs {}", fixture.opponent)),
            closes_at,
            created_at: now,
        })
    }
}

/// Sort key of a message: `<RFC 3339 millis>#<uuid>`, so lexical order is
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    #[must_use]
    pub fn generate(sent_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}#{}",
            sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            Uuid::new_v4()
        ))
    }
}

impl AsRef<str> for MessageId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[schema(value_type = String)]
    pub chat_id: ChatId,
    #[schema(value_type = String)]
    pub message_id: MessageId,
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub user_name: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn compose(
        chat_id: ChatId,
        user_id: UserId,
        user_name: String,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, Error> {
        Ok(Self {
            chat_id,
            message_id: MessageId::generate(now),
            user_id,
            user_name,
            text: bounded_text("text", text, 1, TEXT_MAX)?,
            sent_at: now,
        })
    }
}

/// Resolve the `limit` query parameter.
pub fn message_limit(requested: Option<i64>) -> Result<usize, Error> {
    match requested {
        None => Ok(DEFAULT_MESSAGE_LIMIT),
        Some(value) => {
            let max = i64::try_from(MAX_MESSAGE_LIMIT).unwrap_or(i64::MAX);
            let value = super::validation::bounded_number("limit", value, 1, max)?;
            Ok(usize::try_from(value).unwrap_or(MAX_MESSAGE_LIMIT))
        }
    }
}

/// Keep the `limit` most recent messages, returned oldest first.
#[must_use]
pub fn latest_messages(mut messages: Vec<Message>, limit: usize) -> Vec<Message> {
    messages.sort_by(|a, b| a.message_id.cmp(&b.message_id));
    let skip = messages.len().saturating_sub(limit);
    messages.into_iter().skip(skip).collect()
}
