//! Request guards that pull the authenticated session out of the request.
//!
//! Handlers take `AuthSession` as a parameter; they cannot reach the caller
//! identity without going through verification first.

use std::future::Future;
use std::pin::Pin;

use actix_web::{http::header, web, Error, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::auth::cookie::extract_session_token;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated caller, extracted from the `Authentication` cookie.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequest for AuthSession {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let result = authenticate(req);
        Box::pin(async move { Ok(result?) })
    }
}

/// Cookie header -> token -> verified claims. The websocket handshake runs
/// the exact same sequence in its own handler; both lean on the shared
/// `extract_session_token`.
fn authenticate(req: &HttpRequest) -> Result<AuthSession, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(AppError::Internal)?;

    let raw_cookies = req
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::CredentialMissing)?;

    let token = extract_session_token(raw_cookies)?;
    let claims = state.sessions.verify(token)?;

    Ok(AuthSession {
        user_id: claims.user_id()?,
        email: claims.email,
    })
}
