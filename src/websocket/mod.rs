use std::time::{Duration, Instant};

use actix::{Actor, ActorContext, AsyncContext, StreamHandler};
use actix_web_actors::ws;
use uuid::Uuid;

use crate::models::Message;
use crate::services::bus::{MessageBus, SubscriberId, MESSAGE_CREATED};
use crate::services::message_service::MessageStream;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// One live websocket subscription to a chat.
///
/// The actor owns the filtered `MessageStream` for its subscriber and
/// forwards every yielded message as a JSON text frame. Delivery ends when
/// the connection closes; there is no idle timeout beyond the heartbeat.
pub struct WsSession {
    chat_id: Uuid,
    user_id: Uuid,
    subscriber_id: SubscriberId,
    subscription: Option<MessageStream>,
    bus: MessageBus,
    hb: Instant,
}

impl WsSession {
    pub fn new(chat_id: Uuid, user_id: Uuid, subscription: MessageStream, bus: MessageBus) -> Self {
        let subscriber_id = subscription.subscriber_id();
        Self {
            chat_id,
            user_id,
            subscriber_id,
            subscription: Some(subscription),
            bus,
            hb: Instant::now(),
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                tracing::warn!("websocket heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(
            user_id = %self.user_id,
            chat_id = %self.chat_id,
            "websocket session started"
        );

        self.hb(ctx);

        // Tie the subscription stream to the actor: frames flow for as long
        // as the connection lives, and dropping the stream on stop releases
        // the bus channel.
        if let Some(stream) = self.subscription.take() {
            ctx.add_stream(stream);
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(
            user_id = %self.user_id,
            chat_id = %self.chat_id,
            "websocket session stopped"
        );

        let bus = self.bus.clone();
        let subscriber_id = self.subscriber_id;
        tokio::spawn(async move {
            bus.remove_subscriber(MESSAGE_CREATED, subscriber_id).await;
        });
    }
}

/// Deliveries from the subscription stream go out as JSON text frames.
impl StreamHandler<Message> for WsSession {
    fn handle(&mut self, message: Message, ctx: &mut Self::Context) {
        match serde_json::to_string(&message) {
            Ok(payload) => ctx.text(payload),
            Err(e) => tracing::error!(error = %e, "failed to serialize outbound message"),
        }
    }
}

/// Inbound websocket protocol frames. Subscriptions are one-way, so only
/// control frames matter.
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(_)) | Ok(ws::Message::Binary(_)) => {
                tracing::debug!("ignoring inbound data frame on subscription socket");
            }
            Ok(ws::Message::Close(reason)) => {
                tracing::info!(?reason, "websocket close received");
                ctx.stop();
            }
            _ => {}
        }
    }
}
