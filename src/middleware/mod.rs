pub mod guards;

pub use guards::AuthSession;
