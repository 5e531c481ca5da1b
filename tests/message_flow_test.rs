//! End-to-end service-level tests of the create -> fan-out -> subscribe path.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::time::timeout;
use uuid::Uuid;

use chatter::error::AppError;
use chatter::services::bus::{MessageBus, MESSAGE_CREATED};
use chatter::services::chat_service::ChatService;
use chatter::services::message_service::MessageService;
use chatter::store::{ChatStore, InMemoryChatStore};

const RECV_TIMEOUT: Duration = Duration::from_millis(200);

struct Harness {
    chats: Arc<dyn ChatStore>,
    bus: MessageBus,
}

impl Harness {
    fn new() -> Self {
        Self {
            chats: Arc::new(InMemoryChatStore::new()),
            bus: MessageBus::new(),
        }
    }

    fn chat_service(&self) -> ChatService {
        ChatService::new(self.chats.clone())
    }

    fn message_service(&self, suppress_self_echo: bool) -> MessageService {
        MessageService::new(self.chats.clone(), self.bus.clone(), suppress_self_echo)
    }
}

#[tokio::test]
async fn group_member_receives_message_exactly_once_and_author_receives_nothing() {
    let h = Harness::new();
    let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());

    let chat = h
        .chat_service()
        .create_chat(Some("team".into()), vec![u1, u2], false, u1)
        .await
        .unwrap();

    let svc = h.message_service(true);
    let mut u1_sub = svc.subscribe(chat.id, u1).await.unwrap();
    let mut u2_sub = svc.subscribe(chat.id, u2).await.unwrap();

    let created = svc
        .create_message("hello".into(), chat.id, u1)
        .await
        .unwrap();
    assert_eq!(created.content, "hello");
    assert_eq!(created.author_user_id, u1);

    // U2 gets exactly that message, exactly once.
    let received = timeout(RECV_TIMEOUT, u2_sub.next())
        .await
        .expect("subscriber should receive the message")
        .expect("stream must stay open");
    assert_eq!(received.id, created.id);
    assert_eq!(received.content, "hello");

    assert!(
        timeout(RECV_TIMEOUT, u2_sub.next()).await.is_err(),
        "only one delivery per subscriber"
    );

    // The author sees nothing on the live path.
    assert!(
        timeout(RECV_TIMEOUT, u1_sub.next()).await.is_err(),
        "self-echo must be suppressed"
    );
}

#[tokio::test]
async fn author_receives_own_message_when_suppression_is_disabled() {
    let h = Harness::new();
    let u1 = Uuid::new_v4();

    let chat = h
        .chat_service()
        .create_chat(None, vec![], false, u1)
        .await
        .unwrap();

    let svc = h.message_service(false);
    let mut u1_sub = svc.subscribe(chat.id, u1).await.unwrap();

    svc.create_message("echo".into(), chat.id, u1).await.unwrap();

    let received = timeout(RECV_TIMEOUT, u1_sub.next())
        .await
        .expect("echo policy off: author should receive the event")
        .unwrap();
    assert_eq!(received.content, "echo");
}

#[tokio::test]
async fn subscriber_only_sees_events_for_its_own_chat() {
    let h = Harness::new();
    let u1 = Uuid::new_v4();

    let chat_a = h.chat_service().create_chat(None, vec![], false, u1).await.unwrap();
    let chat_b = h.chat_service().create_chat(None, vec![], false, u1).await.unwrap();

    let svc = h.message_service(false);
    let mut sub_a = svc.subscribe(chat_a.id, u1).await.unwrap();

    svc.create_message("for b".into(), chat_b.id, u1).await.unwrap();
    svc.create_message("for a".into(), chat_a.id, u1).await.unwrap();

    let received = timeout(RECV_TIMEOUT, sub_a.next()).await.unwrap().unwrap();
    assert_eq!(received.content, "for a");
    assert_eq!(received.chat_id, chat_a.id);
}

#[tokio::test]
async fn unauthorized_create_has_no_partial_effect() {
    let h = Harness::new();
    let (u1, u2, outsider) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    let chat = h
        .chat_service()
        .create_chat(Some("private".into()), vec![u1, u2], false, u1)
        .await
        .unwrap();

    let svc = h.message_service(true);
    let mut u2_sub = svc.subscribe(chat.id, u2).await.unwrap();

    let err = svc
        .create_message("intrusion".into(), chat.id, outsider)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ChatNotAccessible));

    // Nothing appended...
    let history = svc.get_messages(chat.id, u1).await.unwrap();
    assert!(history.is_empty(), "rejected create must not append");

    // ...and nothing published.
    assert!(
        timeout(RECV_TIMEOUT, u2_sub.next()).await.is_err(),
        "rejected create must not publish"
    );
}

#[tokio::test]
async fn missing_chat_and_foreign_chat_fail_identically() {
    let h = Harness::new();
    let (owner, outsider) = (Uuid::new_v4(), Uuid::new_v4());

    let chat = h
        .chat_service()
        .create_chat(None, vec![], false, owner)
        .await
        .unwrap();

    let svc = h.message_service(true);

    let foreign = svc.subscribe(chat.id, outsider).await.unwrap_err();
    let missing = svc.subscribe(Uuid::new_v4(), outsider).await.unwrap_err();

    assert!(matches!(foreign, AppError::ChatNotAccessible));
    assert!(matches!(missing, AppError::ChatNotAccessible));
    assert_eq!(foreign.to_string(), missing.to_string());
}

#[tokio::test]
async fn get_messages_on_inaccessible_chat_is_empty_not_an_error() {
    let h = Harness::new();
    let (owner, outsider) = (Uuid::new_v4(), Uuid::new_v4());

    let chat = h
        .chat_service()
        .create_chat(None, vec![], false, owner)
        .await
        .unwrap();

    let svc = h.message_service(true);
    svc.create_message("secret".into(), chat.id, owner).await.unwrap();

    let messages = svc.get_messages(chat.id, outsider).await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn public_chat_is_open_to_any_subscriber() {
    let h = Harness::new();
    let (owner, stranger) = (Uuid::new_v4(), Uuid::new_v4());

    let chat = h
        .chat_service()
        .create_chat(Some("town square".into()), vec![], true, owner)
        .await
        .unwrap();

    let svc = h.message_service(true);
    let mut stranger_sub = svc.subscribe(chat.id, stranger).await.unwrap();

    svc.create_message("hi all".into(), chat.id, owner).await.unwrap();

    let received = timeout(RECV_TIMEOUT, stranger_sub.next()).await.unwrap().unwrap();
    assert_eq!(received.content, "hi all");

    // Strangers may write to a public chat too.
    svc.create_message("hi back".into(), chat.id, stranger).await.unwrap();
    let history = svc.get_messages(chat.id, owner).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn history_preserves_append_order() {
    let h = Harness::new();
    let u1 = Uuid::new_v4();

    let chat = h.chat_service().create_chat(None, vec![], false, u1).await.unwrap();
    let svc = h.message_service(true);

    for i in 0..5 {
        svc.create_message(format!("m{i}"), chat.id, u1).await.unwrap();
    }

    let history = svc.get_messages(chat.id, u1).await.unwrap();
    let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["m0", "m1", "m2", "m3", "m4"]);
}

#[tokio::test]
async fn dropped_subscription_is_pruned_from_the_bus() {
    let h = Harness::new();
    let u1 = Uuid::new_v4();

    let chat = h.chat_service().create_chat(None, vec![], false, u1).await.unwrap();
    let svc = h.message_service(true);

    let sub = svc.subscribe(chat.id, u1).await.unwrap();
    assert_eq!(h.bus.subscriber_count(MESSAGE_CREATED).await, 1);
    drop(sub);

    // The next publish sweeps the dead channel.
    svc.create_message("sweep".into(), chat.id, u1).await.unwrap();
    assert_eq!(h.bus.subscriber_count(MESSAGE_CREATED).await, 0);
}
