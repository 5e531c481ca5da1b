pub mod bus;
pub mod chat_service;
pub mod membership;
pub mod message_service;
pub mod user_service;
