use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single chat message. Immutable once created; lives inside the message
/// array of exactly one chat document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub author_user_id: Uuid,
    pub chat_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Envelope broadcast on the fan-out bus when a message is persisted.
/// Ephemeral: never stored, each subscriber receives its own clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreated {
    pub chat_id: Uuid,
    pub message: Message,
}
