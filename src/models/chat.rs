use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Message;

/// A conversation document. Messages are embedded and append-only; there is
/// no separate message collection.
///
/// Three membership shapes apply: the owner (direct chats), the explicit
/// member list (group chats), and `is_public` (open to everyone).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub name: Option<String>,
    pub owner_user_id: Uuid,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    /// Derived: the most recently appended message, if any.
    pub fn latest_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
