use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::Utc;
use futures_util::Stream;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Message, MessageCreated};
use crate::services::bus::{MessageBus, SubscriberId, MESSAGE_CREATED};
use crate::store::{ChatFilter, ChatStore};

/// Orchestrates message creation, history reads and live subscriptions.
pub struct MessageService {
    chats: Arc<dyn ChatStore>,
    bus: MessageBus,
    suppress_self_echo: bool,
}

impl MessageService {
    pub fn new(chats: Arc<dyn ChatStore>, bus: MessageBus, suppress_self_echo: bool) -> Self {
        Self {
            chats,
            bus,
            suppress_self_echo,
        }
    }

    /// Append a new message to the chat and announce it on the bus.
    ///
    /// The store evaluates the membership filter and the append as one atomic
    /// update; when nothing matched (missing chat or non-member author, the
    /// two are indistinguishable on purpose) the call fails with no message
    /// appended and no event published. Persist-then-notify: the event goes
    /// on the bus only after the store accepted the append.
    pub async fn create_message(
        &self,
        content: String,
        chat_id: Uuid,
        author_user_id: Uuid,
    ) -> AppResult<Message> {
        let message = Message {
            id: Uuid::new_v4(),
            content,
            author_user_id,
            chat_id,
            created_at: Utc::now(),
        };

        let filter = ChatFilter::accessible_by_id(chat_id, author_user_id);
        let updated = self
            .chats
            .find_one_and_push_message(&filter, message.clone())
            .await?;

        if updated.is_none() {
            return Err(AppError::ChatNotAccessible);
        }

        self.bus
            .publish(
                MESSAGE_CREATED,
                MessageCreated {
                    chat_id,
                    message: message.clone(),
                },
            )
            .await;

        tracing::debug!(%chat_id, author = %author_user_id, "message created and published");
        Ok(message)
    }

    /// Message history of a chat.
    ///
    /// An inaccessible chat yields an empty list rather than an error — the
    /// caller cannot tell a chat they were excluded from apart from one that
    /// never existed.
    pub async fn get_messages(&self, chat_id: Uuid, user_id: Uuid) -> AppResult<Vec<Message>> {
        let filter = ChatFilter::accessible_by_id(chat_id, user_id);
        Ok(self
            .chats
            .find_one(&filter)
            .await?
            .map(|chat| chat.messages)
            .unwrap_or_default())
    }

    /// Open a live subscription to a chat's new messages.
    ///
    /// Membership is checked once, here; a member removed while the stream is
    /// open keeps receiving until disconnect. That staleness window is a
    /// deliberate trade: re-checking would put store I/O on every delivery.
    pub async fn subscribe(&self, chat_id: Uuid, user_id: Uuid) -> AppResult<MessageStream> {
        let filter = ChatFilter::accessible_by_id(chat_id, user_id);
        if self.chats.find_one(&filter).await?.is_none() {
            return Err(AppError::ChatNotAccessible);
        }

        let (subscriber_id, receiver) = self.bus.subscribe(MESSAGE_CREATED).await;

        Ok(MessageStream {
            receiver,
            subscriber_id,
            chat_id,
            user_id,
            suppress_self_echo: self.suppress_self_echo,
        })
    }
}

/// Per-subscriber delivery stage over the raw bus feed.
///
/// The bus is one shared broadcast topic, so every subscription re-derives
/// eligibility for each event independently: only events for its chat pass,
/// and under the self-echo policy none authored by the subscriber itself (the
/// author already holds the message from the create response).
#[derive(Debug)]
pub struct MessageStream {
    receiver: UnboundedReceiver<MessageCreated>,
    subscriber_id: SubscriberId,
    chat_id: Uuid,
    user_id: Uuid,
    suppress_self_echo: bool,
}

impl MessageStream {
    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn wants(&self, event: &MessageCreated) -> bool {
        event.chat_id == self.chat_id
            && !(self.suppress_self_echo && event.message.author_user_id == self.user_id)
    }
}

impl Stream for MessageStream {
    type Item = Message;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match this.receiver.poll_recv(cx) {
                Poll::Ready(Some(event)) if this.wants(&event) => {
                    return Poll::Ready(Some(event.message))
                }
                // Somebody else's chat, or our own echo: skip and keep polling.
                Poll::Ready(Some(_)) => continue,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
