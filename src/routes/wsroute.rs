use actix_web::{get, http::header, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::cookie::extract_session_token;
use crate::error::AppError;
use crate::state::AppState;
use crate::websocket::WsSession;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub chat_id: Uuid,
}

/// GET /ws?chat_id=... — websocket subscription handshake.
///
/// The handshake authenticates exactly like a plain request: the raw Cookie
/// header goes through the shared `extract_session_token`, then the codec.
/// Authorization happens inside `subscribe()`, so a chat the caller cannot
/// read rejects the handshake the same way a missing chat does.
#[get("/ws")]
pub async fn ws_handler(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
    query: web::Query<WsParams>,
) -> Result<HttpResponse, Error> {
    let params = query.into_inner();

    let raw_cookies = req
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::CredentialMissing)?;

    let token = extract_session_token(raw_cookies)?;
    let claims = state.sessions.verify(token)?;
    let user_id = claims.user_id()?;

    let subscription = state
        .message_service()
        .subscribe(params.chat_id, user_id)
        .await?;

    tracing::info!(%user_id, chat_id = %params.chat_id, "websocket subscription accepted");

    let session = WsSession::new(params.chat_id, user_id, subscription, state.bus.clone());
    ws::start(session, &req, stream)
}
