//! Auth gate error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors from authentication and token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No token was presented on a protected request.
    #[error("authentication required")]
    MissingToken,

    /// The token is malformed or its signature does not verify.
    #[error("invalid token")]
    InvalidToken,

    /// The token verified but has expired.
    #[error("expired token")]
    ExpiredToken,

    /// The submitted email is not structurally valid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] tavola_core::EmailError),

    /// Password hashing or token signing failed.
    #[error("credential processing failed: {0}")]
    Crypto(String),

    /// The underlying account lookup failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
