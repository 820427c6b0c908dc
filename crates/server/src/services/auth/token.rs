//! Session token issuance and verification.
//!
//! Tokens are self-contained HS256 JWTs carrying identity and role
//! claims. Nothing is persisted server-side: a token is valid iff its
//! signature checks out against the server secret and it has not
//! expired. There is no revocation list.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tangelo_core::UserId;

use crate::models::User;

/// Token lifetime: 1 hour from issuance.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Errors from token verification.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed token, bad signature, or expired.
    #[error("invalid or expired token")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    /// The `sub` claim is not a user ID.
    #[error("token subject is not a valid user id")]
    BadSubject,
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, stringified (standard JWT subject).
    pub sub: String,
    /// Email at issuance time.
    pub email: String,
    /// Whether this user may perform catalog writes. Embedded so that
    /// admin routes need no database read; a promoted or demoted user
    /// must log in again for the claim to change.
    pub is_admin: bool,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

impl Claims {
    /// Parse the subject claim back into a [`UserId`].
    ///
    /// # Errors
    ///
    /// Returns `TokenError::BadSubject` if `sub` is not an integer.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub
            .parse::<i32>()
            .map(UserId::new)
            .map_err(|_| TokenError::BadSubject)
    }
}

/// Issue a signed session token for a user.
///
/// # Errors
///
/// Returns `TokenError::Invalid` if encoding fails.
pub fn issue(user: &User, secret: &[u8]) -> Result<String, TokenError> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.to_string(),
        is_admin: user.is_admin,
        iat,
        exp: iat + TOKEN_TTL_SECS,
    };

    Ok(jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}

/// Verify a token's signature and expiry, returning its claims.
///
/// # Errors
///
/// Returns `TokenError::Invalid` for a malformed token, a signature
/// mismatch, or an expired token.
pub fn verify(token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
