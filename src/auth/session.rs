use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Claims embedded in a session token.
///
/// The token is the whole session: there is no server-side session store, so
/// everything a request handler needs about the caller lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Subject (user id as UUID string)
    pub sub: String,
    pub email: String,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration (unix timestamp)
    pub exp: i64,
    /// Any additional claims the issuer chose to bind into the session.
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, JsonValue>,
}

impl TokenPayload {
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::InvalidCredential)
    }
}

/// A freshly signed token together with its absolute expiry, so the transport
/// layer can stamp the cookie with the same deadline.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens (HS256, shared secret from config).
///
/// Verification is pure computation; it never touches storage and never
/// renews a credential. Re-authentication is the only way to extend a
/// session.
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token binding `user_id` (plus any extra claims) to an absolute
    /// expiry of now + `ttl`. No side effects; transmitting the token is the
    /// caller's business.
    pub fn issue(
        &self,
        user_id: Uuid,
        email: &str,
        extra: Map<String, JsonValue>,
        ttl: Duration,
    ) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = TokenPayload {
            sub: user_id.to_string(),
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            extra,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Fails with `InvalidCredential` on a bad signature, a structurally
    /// malformed token, or `now >= exp`. The error carries no detail about
    /// which check failed.
    pub fn verify(&self, token: &str) -> AppResult<TokenPayload> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<TokenPayload>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidCredential)?;

        // jsonwebtoken treats exp == now as still valid; a token expiring
        // this very second must already be dead, and so must anything issued
        // with a non-positive ttl.
        if claims.exp <= Utc::now().timestamp() {
            return Err(AppError::InvalidCredential);
        }

        Ok(claims)
    }
}
