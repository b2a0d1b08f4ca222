//! Credential handling for Bookstall: bcrypt password hashes and HS256 bearer tokens.

pub mod password;
pub mod token;

pub use password::PasswordHasher;
pub use token::{bearer_token, Claims, IssuedToken, TokenIssuer};

use thiserror::Error;

/// Failures raised while hashing credentials or issuing/verifying tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid bearer token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl AuthError {
    /// Whether the failure is the caller's fault rather than a server fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AuthError::MissingToken | AuthError::InvalidToken(_))
    }
}
