use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::guards::AuthSession;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateMessageRequest {
    pub content: String,
}

/// POST /chats/{chat_id}/messages — append a message as the caller.
#[post("/chats/{chat_id}/messages")]
pub async fn send_message(
    state: web::Data<AppState>,
    session: AuthSession,
    chat_id: web::Path<Uuid>,
    body: web::Json<CreateMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("content must not be empty".into()));
    }

    let message = state
        .message_service()
        .create_message(body.content, chat_id.into_inner(), session.user_id)
        .await?;

    Ok(HttpResponse::Created().json(message))
}

/// GET /chats/{chat_id}/messages — the chat's history, empty when the caller
/// has no access.
#[get("/chats/{chat_id}/messages")]
pub async fn get_messages(
    state: web::Data<AppState>,
    session: AuthSession,
    chat_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let messages = state
        .message_service()
        .get_messages(chat_id.into_inner(), session.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(messages))
}
