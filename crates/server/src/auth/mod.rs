//! The auth gate: staff login and session tokens.
//!
//! Passwords are stored only as salted argon2id hashes; sessions are
//! stateless HS256 tokens delivered in an HTTP-only cookie (see
//! [`token::TokenService`] and the middleware layer).

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use tavola_core::Email;

use crate::db::admins::AdminRepository;
use crate::models::Admin;

/// Staff authentication service.
pub struct AuthService<'a> {
    admins: AdminRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            admins: AdminRepository::new(pool),
            tokens,
        }
    }

    /// Login with email and password, minting a session token on success.
    ///
    /// Unknown emails and wrong passwords both surface as
    /// [`AuthError::InvalidCredentials`]; the argon2 verification itself is
    /// constant-time over the hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the email/password pair
    /// is wrong, or a repository/crypto error.
    pub async fn login(&self, email: &Email, password: &str) -> Result<(Admin, String), AuthError> {
        let admin = self
            .admins
            .get_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &admin.password_hash)?;

        let token = self.tokens.issue(&admin)?;
        Ok((admin, token))
    }
}

/// Hash a password using argon2id with a fresh random salt.
///
/// # Errors
///
/// Returns [`AuthError::Crypto`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Crypto(e.to_string()))
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Crypto(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_is_invalid_credentials() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(matches!(
            verify_password("Tr0ub4dor&3", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_garbage_stored_hash_is_crypto_error() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::Crypto(_))
        ));
    }
}
