pub mod cookie;
pub mod session;

pub use cookie::{extract_session_token, AUTH_COOKIE};
pub use session::{IssuedToken, SessionCodec, TokenPayload};
