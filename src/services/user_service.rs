use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::store::UserStore;

/// Account registration and credential verification (Argon2id).
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn register(&self, email: String, password: &str) -> AppResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        // The store's unique email constraint is the authority on duplicates.
        self.users.insert_one(user).await
    }

    /// Look up the account and check the password. Fails uniformly with
    /// `InvalidCredential` whether the account is missing or the password is
    /// wrong; login must not be a user-enumeration oracle.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredential)?;

        verify_password(password, &user.password_hash)?;
        Ok(user)
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(rand::thread_rng());

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::Internal)
}

fn verify_password(password: &str, hash: &str) -> AppResult<()> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::Internal)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredential)
}
