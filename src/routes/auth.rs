use actix_web::{post, web, HttpResponse};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use uuid::Uuid;

use crate::auth::cookie::{login_cookie, logout_cookie};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// POST /auth/login
/// Verify credentials, issue a session token and set it as the
/// `Authentication` cookie.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .user_service()
        .verify_credentials(&body.email, &body.password)
        .await?;

    let ttl = Duration::seconds(state.config.jwt_ttl_seconds);
    let issued = state
        .sessions
        .issue(user.id, &user.email, Map::new(), ttl)?;

    tracing::info!(user_id = %user.id, "login");

    Ok(HttpResponse::Ok()
        .cookie(login_cookie(&issued))
        .json(LoginResponse {
            user_id: user.id,
            email: user.email,
            expires_at: issued.expires_at,
        }))
}

/// POST /auth/logout
/// Stateless logout: overwrite the cookie with an already-expired credential.
#[post("/auth/logout")]
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok().cookie(logout_cookie()).finish()
}
