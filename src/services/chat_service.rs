use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Chat;
use crate::store::{ChatFilter, ChatStore};

/// Chat lifecycle: creation and lookups. Message traffic lives in
/// `MessageService`.
pub struct ChatService {
    chats: Arc<dyn ChatStore>,
}

impl ChatService {
    pub fn new(chats: Arc<dyn ChatStore>) -> Self {
        Self { chats }
    }

    /// Create a chat owned by the caller. The owner is a member implicitly
    /// and does not need to appear in `member_ids`.
    pub async fn create_chat(
        &self,
        name: Option<String>,
        member_ids: Vec<Uuid>,
        is_public: bool,
        owner_user_id: Uuid,
    ) -> AppResult<Chat> {
        let chat = Chat {
            id: Uuid::new_v4(),
            name,
            owner_user_id,
            member_ids,
            is_public,
            messages: Vec::new(),
            created_at: Utc::now(),
        };

        self.chats.insert_one(chat).await
    }

    /// Every chat the user may read, in creation order.
    pub async fn list_chats(&self, user_id: Uuid) -> AppResult<Vec<Chat>> {
        self.chats.find(&ChatFilter::accessible_to(user_id)).await
    }

    /// Plain lookup by id, unfiltered by membership.
    pub async fn get_chat(&self, id: Uuid) -> AppResult<Option<Chat>> {
        self.chats.find_one(&ChatFilter::by_id(id)).await
    }
}
