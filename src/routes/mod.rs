// Re-export route modules
pub mod auth;
pub mod chats;
pub mod messages;
pub mod users;
pub mod wsroute;
