//! Stateless admin session tokens.
//!
//! A token is a compact HS256 JWT: `base64url(header).base64url(claims).
//! base64url(signature)`, signed with the server-held secret. Identity lives
//! entirely in the token - there is no server-side session row. Verification
//! checks structure, signature (constant time), and expiry. Revocation is a
//! deliberate non-feature today; the service boundary is shaped so a denylist
//! keyed by `iat` or a token id can be added without touching callers.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use tavola_core::AdminId;

use super::error::AuthError;
use crate::models::Admin;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime: 24 hours.
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// The fixed JOSE header for every token this service mints.
const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Claims embedded in an admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin account id.
    pub id: AdminId,
    pub email: String,
    pub name: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Issues and verifies admin session tokens.
#[derive(Clone)]
pub struct TokenService {
    key: Vec<u8>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    /// Create a token service signing with `secret`.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        Self {
            key: secret.expose_secret().as_bytes().to_vec(),
        }
    }

    /// Issue a token for `admin`, expiring 24 hours from now.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Crypto`] if the claims cannot be serialized.
    pub fn issue(&self, admin: &Admin) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            id: admin.id,
            email: admin.email.to_string(),
            name: admin.name.clone(),
            iat,
            exp: iat + TOKEN_TTL_SECONDS,
        };
        self.issue_claims(&claims)
    }

    /// Issue a token for explicit claims. Split out so expiry behavior is
    /// testable without waiting a day.
    pub(crate) fn issue_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        let header = URL_SAFE_NO_PAD.encode(HEADER);
        let payload = serde_json::to_vec(claims).map_err(|e| AuthError::Crypto(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(payload);

        let signing_input = format!("{header}.{payload}");
        let signature = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes())?);

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verify a token's structure, signature, and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for structural or signature
    /// failures and [`AuthError::ExpiredToken`] once `exp` has passed.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::InvalidToken);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;

        // Constant-time signature check before anything is decoded.
        let signing_input = format!("{header}.{payload}");
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;

        if Utc::now().timestamp() >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AuthError::Crypto(format!("invalid signing key: {e}")))
    }

    fn sign(&self, input: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = self.mac()?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Build claims expiring `ttl` from now (negative for already-expired).
#[cfg(test)]
pub(crate) fn claims_with_ttl(admin: &Admin, ttl: chrono::Duration) -> Claims {
    let iat = Utc::now().timestamp();
    Claims {
        id: admin.id,
        email: admin.email.to_string(),
        name: admin.name.clone(),
        iat,
        exp: iat + ttl.num_seconds(),
    }
}
