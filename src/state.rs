use std::sync::Arc;

use crate::{
    auth::session::SessionCodec,
    config::Config,
    services::{
        bus::MessageBus, chat_service::ChatService, message_service::MessageService,
        user_service::UserService,
    },
    store::{ChatStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub chats: Arc<dyn ChatStore>,
    pub users: Arc<dyn UserStore>,
    pub bus: MessageBus,
    pub sessions: Arc<SessionCodec>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn chat_service(&self) -> ChatService {
        ChatService::new(self.chats.clone())
    }

    pub fn message_service(&self) -> MessageService {
        MessageService::new(
            self.chats.clone(),
            self.bus.clone(),
            self.config.suppress_self_echo,
        )
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(self.users.clone())
    }
}
