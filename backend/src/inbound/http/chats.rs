//! Post-match chat endpoints.
//!
//! ```text
//! POST /chats                       {"matchId":"...","name":"...",
//!                                    "closesAt":"2026-04-13T05:00:00Z"}
//! GET  /chats?matchId=
//! GET  /chats/{chatId}
//! GET  /chats/{chatId}/messages?limit=100
//! POST /chats/{chatId}/messages     {"text":"..."}
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::chat::message_limit;
use crate::domain::{ChatDraft, ChatId, ChatView, Error, MatchId, Message};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, AuthenticatedUser};
use crate::inbound::http::state::HttpState;

/// Body for `POST /chats`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    pub match_id: String,
    /// Defaults to `vs <opponent>`.
    pub name: Option<String>,
    /// Defaults to kickoff plus 24 hours; must be in the future.
    pub closes_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ChatListQuery {
    pub match_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MessageListQuery {
    /// Most recent messages to return, 1 to 500 (default 100).
    pub limit: Option<i64>,
}

/// Body for `POST /chats/{chatId}/messages`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PostMessageRequest {
    #[schema(example = "What a finish!")]
    pub text: String,
}

fn chat_id(path: web::Path<String>) -> Result<ChatId, Error> {
    ChatId::new(path.into_inner())
}

/// Open a chat for a fixture. Administrators only.
#[utoipa::path(
    post,
    path = "/chats",
    request_body = CreateChatRequest,
    responses(
        (status = 200, description = "Chat created", body = ChatView),
        (status = 400, description = "Invalid request or closesAt in the past", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Fixture not found", body = Error)
    ),
    tags = ["chats"],
    operation_id = "createChat"
)]
#[post("/chats")]
pub async fn create_chat(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    payload: web::Json<CreateChatRequest>,
) -> ApiResult<web::Json<ChatView>> {
    let CreateChatRequest {
        match_id,
        name,
        closes_at,
    } = payload.into_inner();
    let match_id = MatchId::new(match_id)?;
    let draft = ChatDraft::try_from_parts(name.as_deref(), closes_at)?;
    Ok(web::Json(state.chats.create_chat(&match_id, draft).await?))
}

#[utoipa::path(
    get,
    path = "/chats",
    params(ChatListQuery),
    responses((status = 200, description = "Chats with their open flag", body = [ChatView])),
    tags = ["chats"],
    operation_id = "listChats"
)]
#[get("/chats")]
pub async fn list_chats(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    query: web::Query<ChatListQuery>,
) -> ApiResult<web::Json<Vec<ChatView>>> {
    let match_id = query.into_inner().match_id.map(MatchId::new).transpose()?;
    Ok(web::Json(state.chats.list_chats(match_id.as_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/chats/{chatId}",
    params(("chatId" = String, Path, description = "Chat identifier")),
    responses(
        (status = 200, description = "Chat", body = ChatView),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["chats"],
    operation_id = "getChat"
)]
#[get("/chats/{chat_id}")]
pub async fn get_chat(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ChatView>> {
    Ok(web::Json(state.chats.get_chat(&chat_id(path)?).await?))
}

/// Most recent messages, returned oldest first.
#[utoipa::path(
    get,
    path = "/chats/{chatId}/messages",
    params(("chatId" = String, Path, description = "Chat identifier"), MessageListQuery),
    responses(
        (status = 200, description = "Messages", body = [Message]),
        (status = 400, description = "Limit out of range", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["chats"],
    operation_id = "listMessages"
)]
#[get("/chats/{chat_id}/messages")]
pub async fn list_messages(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
    query: web::Query<MessageListQuery>,
) -> ApiResult<web::Json<Vec<Message>>> {
    let id = chat_id(path)?;
    let limit = message_limit(query.limit)?;
    Ok(web::Json(state.chats.messages(&id, limit).await?))
}

#[utoipa::path(
    post,
    path = "/chats/{chatId}/messages",
    params(("chatId" = String, Path, description = "Chat identifier")),
    request_body = PostMessageRequest,
    responses(
        (status = 200, description = "Message posted", body = Message),
        (status = 400, description = "Invalid text", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Chat closed", body = Error)
    ),
    tags = ["chats"],
    operation_id = "postMessage"
)]
#[post("/chats/{chat_id}/messages")]
pub async fn post_message(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<PostMessageRequest>,
) -> ApiResult<web::Json<Message>> {
    let id = chat_id(path)?;
    Ok(web::Json(
        state.chats.post_message(&caller, &id, &payload.text).await?,
    ))
}
