//! Authentication error types.

use portico_core::error::PorticoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, inactive account, and password mismatch all
    /// collapse to this one variant so the response never reveals
    /// which half of the credential was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for PorticoError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => PorticoError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => PorticoError::Crypto(msg),
        }
    }
}
