use dotenvy::dotenv;
use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    /// Session lifetime in seconds; token expiry is the only auth timeout.
    pub jwt_ttl_seconds: i64,
    /// When true, a subscriber never receives a live copy of a message it
    /// authored itself. Kept configurable because the create response already
    /// carries the message, but some clients prefer the echo.
    pub suppress_self_echo: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("PORT: {e}")))?;

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| AppError::Config("JWT_SECRET is required".into()))?;

        let jwt_ttl_seconds = env::var("JWT_EXPIRATION")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<i64>()
            .map_err(|e| AppError::Config(format!("JWT_EXPIRATION: {e}")))?;

        let suppress_self_echo = env::var("SELF_ECHO_SUPPRESSION")
            .map(|v| !matches!(v.as_str(), "false" | "0"))
            .unwrap_or(true);

        Ok(Self {
            port,
            jwt_secret,
            jwt_ttl_seconds,
            suppress_self_echo,
        })
    }
}
