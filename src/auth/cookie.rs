use actix_web::cookie::{time::OffsetDateTime, Cookie};

use crate::auth::session::IssuedToken;
use crate::error::{AppError, AppResult};

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "Authentication";

/// Pull the session token out of a raw `Cookie` header value.
///
/// Plain requests and the websocket handshake both feed their header through
/// this one routine; session proof must never depend on transport-specific
/// cookie middleware being mounted.
pub fn extract_session_token(raw_header: &str) -> AppResult<&str> {
    for entry in raw_header.split(';') {
        if let Some((name, value)) = entry.split_once('=') {
            if name.trim() == AUTH_COOKIE {
                let value = value.trim();
                if value.is_empty() {
                    return Err(AppError::CredentialMissing);
                }
                return Ok(value);
            }
        }
    }

    Err(AppError::CredentialMissing)
}

/// Session cookie for a successful login. HttpOnly, expires together with
/// the token itself.
pub fn login_cookie(issued: &IssuedToken) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, issued.token.clone())
        .http_only(true)
        .path("/")
        .expires(
            OffsetDateTime::from_unix_timestamp(issued.expires_at.timestamp())
                .unwrap_or(OffsetDateTime::UNIX_EPOCH),
        )
        .finish()
}

/// Logout replaces the credential with an already-expired empty cookie; the
/// token itself cannot be revoked, only discarded.
pub fn logout_cookie() -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, "")
        .http_only(true)
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_cookie_list() {
        let header = "Authentication=T; other=x";
        assert_eq!(extract_session_token(header).unwrap(), "T");
    }

    #[test]
    fn extracts_token_regardless_of_position() {
        let header = "theme=dark; Authentication=abc.def.ghi; lang=en";
        assert_eq!(extract_session_token(header).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_entry_is_credential_missing() {
        let err = extract_session_token("other=x; theme=dark").unwrap_err();
        assert!(matches!(err, AppError::CredentialMissing));
    }

    #[test]
    fn empty_value_is_credential_missing() {
        let err = extract_session_token("Authentication=; other=x").unwrap_err();
        assert!(matches!(err, AppError::CredentialMissing));
    }

    #[test]
    fn name_must_match_exactly() {
        // A cookie merely containing the name must not be mistaken for it.
        let err = extract_session_token("XAuthentication=T").unwrap_err();
        assert!(matches!(err, AppError::CredentialMissing));
    }
}
