use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Chat, Message, User};
use crate::services::membership::AccessIntent;
use crate::store::{ChatFilter, ChatStore, UserStore};

/// In-process chat store. A write lock around the whole map gives the same
/// single-document atomicity a real document store provides per update.
#[derive(Default, Clone)]
pub struct InMemoryChatStore {
    inner: Arc<RwLock<HashMap<Uuid, Chat>>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn insert_one(&self, chat: Chat) -> AppResult<Chat> {
        let mut guard = self.inner.write().await;
        guard.insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn find_one(&self, filter: &ChatFilter) -> AppResult<Option<Chat>> {
        let guard = self.inner.read().await;
        Ok(guard
            .values()
            .find(|chat| filter.matches(chat, AccessIntent::Read))
            .cloned())
    }

    async fn find(&self, filter: &ChatFilter) -> AppResult<Vec<Chat>> {
        let guard = self.inner.read().await;
        let mut chats: Vec<Chat> = guard
            .values()
            .filter(|chat| filter.matches(chat, AccessIntent::Read))
            .cloned()
            .collect();
        chats.sort_by_key(|chat| chat.created_at);
        Ok(chats)
    }

    async fn find_one_and_push_message(
        &self,
        filter: &ChatFilter,
        message: Message,
    ) -> AppResult<Option<Chat>> {
        let mut guard = self.inner.write().await;

        // Filter and append under the same write lock: the membership check
        // cannot go stale between evaluation and mutation.
        let chat = guard
            .values_mut()
            .find(|chat| filter.matches(chat, AccessIntent::Write));

        Ok(chat.map(|chat| {
            chat.messages.push(message);
            chat.clone()
        }))
    }
}

/// In-process user store with a unique email constraint.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    inner: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert_one(&self, user: User) -> AppResult<User> {
        let mut guard = self.inner.write().await;

        if guard.values().any(|existing| existing.email == user.email) {
            return Err(AppError::BadRequest("email already registered".into()));
        }

        guard.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let guard = self.inner.read().await;
        Ok(guard.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let guard = self.inner.read().await;
        Ok(guard.get(&id).cloned())
    }
}
