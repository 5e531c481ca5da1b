use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server start failure: {0}")]
    StartServer(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    // The two credential failures render identically on the wire: the caller
    // must not learn whether a token was absent, malformed or expired.
    #[error("unauthorized")]
    CredentialMissing,

    #[error("unauthorized")]
    InvalidCredential,

    /// Covers both a chat that does not exist and one the caller is not a
    /// member of. Collapsing the two keeps chat ids unenumerable.
    #[error("chat not accessible")]
    ChatNotAccessible,

    #[error("storage error: {0}")]
    Database(String),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    /// Returns HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) => 400,
            AppError::CredentialMissing | AppError::InvalidCredential => 401,
            AppError::ChatNotAccessible => 404,
            AppError::Config(_)
            | AppError::StartServer(_)
            | AppError::Database(_)
            | AppError::Internal => 500,
        }
    }

    fn error_label(&self) -> &'static str {
        match self.status_code() {
            400 => "Bad Request",
            401 => "Unauthorized",
            404 => "Not Found",
            _ => "Internal Server Error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(AppError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = ResponseError::status_code(self);

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.error_label(),
            "message": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}
