use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
}

/// POST /users — account registration.
#[post("/users")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest(
            "email and password must not be empty".into(),
        ));
    }

    let user = state.user_service().register(body.email, &body.password).await?;

    Ok(HttpResponse::Created().json(UserResponse {
        id: user.id,
        email: user.email,
    }))
}
