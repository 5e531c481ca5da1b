pub mod chat;
pub mod message;
pub mod user;

pub use chat::Chat;
pub use message::{Message, MessageCreated};
pub use user::User;
