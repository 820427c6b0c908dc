//! Authentication service.
//!
//! Password-based signup and login. Passwords are hashed with bcrypt at
//! cost factor 12; session tokens are issued by [`token`].

mod error;
pub mod token;

pub use error::AuthError;

use sqlx::PgPool;

use tangelo_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// bcrypt cost factor. Expensive on purpose to resist brute force.
const BCRYPT_COST: u32 = 12;

/// Authentication service.
///
/// Handles user registration and login against the user repository.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, is_admin)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// Unknown email, malformed email, and wrong password all collapse
    /// into `AuthError::InvalidCredentials`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let (user, password_hash) = self
            .users
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}

/// Hash a password with bcrypt at [`BCRYPT_COST`].
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

/// Verify a password against a bcrypt digest.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if the digest is unparseable.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(password, digest)?)
}
