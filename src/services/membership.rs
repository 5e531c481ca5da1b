use uuid::Uuid;

use crate::models::Chat;

/// What the caller wants to do with the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessIntent {
    Read,
    Write,
}

/// The one authorization predicate for chats. Pure; no I/O.
///
/// A user may touch a chat iff it is public, they own it (direct chats), or
/// they appear in its member list (group chats). Writing carries no extra
/// membership class beyond reading; the intent parameter keeps call sites
/// honest about which operation they perform.
///
/// A chat matching none of the three must behave as if it does not exist:
/// callers return empty results or the merged not-accessible error, never a
/// permission-denied that confirms existence.
pub fn is_authorized(user_id: Uuid, chat: &Chat, intent: AccessIntent) -> bool {
    match intent {
        AccessIntent::Read | AccessIntent::Write => {
            chat.is_public || chat.owner_user_id == user_id || chat.member_ids.contains(&user_id)
        }
    }
}
