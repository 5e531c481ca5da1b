use chatter::auth::session::SessionCodec;
use chatter::error::AppError;
use chrono::Duration;
use serde_json::{json, Map};
use uuid::Uuid;

#[test]
fn issue_then_verify_round_trips_claims() {
    let codec = SessionCodec::new("test-secret");
    let user_id = Uuid::new_v4();

    let mut extra = Map::new();
    extra.insert("display_name".to_string(), json!("alice"));

    let issued = codec
        .issue(user_id, "alice@example.com", extra.clone(), Duration::seconds(60))
        .unwrap();

    let claims = codec.verify(&issued.token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.extra, extra);
    assert_eq!(claims.exp, issued.expires_at.timestamp());
}

#[test]
fn zero_ttl_token_is_already_expired() {
    let codec = SessionCodec::new("test-secret");
    let issued = codec
        .issue(Uuid::new_v4(), "a@example.com", Map::new(), Duration::seconds(0))
        .unwrap();

    let err = codec.verify(&issued.token).unwrap_err();
    assert!(matches!(err, AppError::InvalidCredential));
}

#[test]
fn negative_ttl_token_is_rejected() {
    let codec = SessionCodec::new("test-secret");
    let issued = codec
        .issue(Uuid::new_v4(), "a@example.com", Map::new(), Duration::seconds(-30))
        .unwrap();

    let err = codec.verify(&issued.token).unwrap_err();
    assert!(matches!(err, AppError::InvalidCredential));
}

#[test]
fn wrong_secret_is_rejected() {
    let codec = SessionCodec::new("test-secret");
    let other = SessionCodec::new("other-secret");

    let issued = codec
        .issue(Uuid::new_v4(), "a@example.com", Map::new(), Duration::seconds(60))
        .unwrap();

    let err = other.verify(&issued.token).unwrap_err();
    assert!(matches!(err, AppError::InvalidCredential));
}

#[test]
fn malformed_token_is_rejected() {
    let codec = SessionCodec::new("test-secret");
    assert!(matches!(
        codec.verify("not_a_jwt").unwrap_err(),
        AppError::InvalidCredential
    ));
    assert!(matches!(
        codec.verify("").unwrap_err(),
        AppError::InvalidCredential
    ));
}
