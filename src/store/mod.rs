//! Document-store contract the messaging core consumes.
//!
//! Real persistence is an external collaborator; the core only relies on
//! single-document atomic operations over chat documents, each embedding its
//! own message array. The in-memory implementation backs the binary and the
//! tests; a database-backed store slots in behind the same traits.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Chat, Message, User};
use crate::services::membership::{is_authorized, AccessIntent};

pub mod memory;

pub use memory::{InMemoryChatStore, InMemoryUserStore};

/// Query shape understood by chat stores: an optional id match plus an
/// optional "accessible to this user" constraint (the membership predicate).
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatFilter {
    pub id: Option<Uuid>,
    pub accessible_to: Option<Uuid>,
}

impl ChatFilter {
    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            accessible_to: None,
        }
    }

    pub fn accessible_to(user_id: Uuid) -> Self {
        Self {
            id: None,
            accessible_to: Some(user_id),
        }
    }

    pub fn accessible_by_id(id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Some(id),
            accessible_to: Some(user_id),
        }
    }

    /// Evaluate the filter against a chat document.
    pub fn matches(&self, chat: &Chat, intent: AccessIntent) -> bool {
        if let Some(id) = self.id {
            if chat.id != id {
                return false;
            }
        }
        if let Some(user_id) = self.accessible_to {
            if !is_authorized(user_id, chat, intent) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn insert_one(&self, chat: Chat) -> AppResult<Chat>;

    async fn find_one(&self, filter: &ChatFilter) -> AppResult<Option<Chat>>;

    /// All chats matching `filter`, in creation order.
    async fn find(&self, filter: &ChatFilter) -> AppResult<Vec<Chat>>;

    /// Atomic filtered append: push `message` onto the single chat matching
    /// `filter` and return the updated document, or `None` when nothing
    /// matched. The filter must be evaluated and the append applied as one
    /// step so a membership check can never race the write.
    async fn find_one_and_push_message(
        &self,
        filter: &ChatFilter,
        message: Message,
    ) -> AppResult<Option<Chat>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; the email column is unique.
    async fn insert_one(&self, user: User) -> AppResult<User>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
}
