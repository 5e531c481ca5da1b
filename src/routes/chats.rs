use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::guards::AuthSession;
use crate::models::{Chat, Message};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateChatRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
    #[serde(default)]
    pub is_public: bool,
}

/// Chat without its message array; listings stay light and expose only the
/// derived latest message.
#[derive(Serialize)]
pub struct ChatSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub owner_user_id: Uuid,
    pub member_ids: Vec<Uuid>,
    pub is_public: bool,
    pub latest_message: Option<Message>,
}

impl From<Chat> for ChatSummary {
    fn from(chat: Chat) -> Self {
        let latest_message = chat.latest_message().cloned();
        Self {
            id: chat.id,
            name: chat.name,
            owner_user_id: chat.owner_user_id,
            member_ids: chat.member_ids,
            is_public: chat.is_public,
            latest_message,
        }
    }
}

/// POST /chats — create a chat owned by the caller.
#[post("/chats")]
pub async fn create_chat(
    state: web::Data<AppState>,
    session: AuthSession,
    body: web::Json<CreateChatRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let chat = state
        .chat_service()
        .create_chat(body.name, body.member_ids, body.is_public, session.user_id)
        .await?;

    Ok(HttpResponse::Created().json(ChatSummary::from(chat)))
}

/// GET /chats — every chat the caller may read.
#[get("/chats")]
pub async fn list_chats(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<HttpResponse, AppError> {
    let chats = state.chat_service().list_chats(session.user_id).await?;
    let summaries: Vec<ChatSummary> = chats.into_iter().map(ChatSummary::from).collect();

    Ok(HttpResponse::Ok().json(summaries))
}

/// GET /chats/{id} — single chat lookup.
#[get("/chats/{id}")]
pub async fn get_chat(
    state: web::Data<AppState>,
    _session: AuthSession,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let chat = state
        .chat_service()
        .get_chat(id.into_inner())
        .await?
        .ok_or(AppError::ChatNotAccessible)?;

    Ok(HttpResponse::Ok().json(ChatSummary::from(chat)))
}
