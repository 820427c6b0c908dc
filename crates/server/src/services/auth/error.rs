//! Authentication error types.

use thiserror::Error;

use tangelo_core::EmailError;

use crate::db::RepositoryError;

/// Errors from signup and login flows.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email is already registered.
    #[error("email already in use")]
    EmailTaken,

    /// Unknown email or wrong password. The two cases are deliberately
    /// indistinguishable to prevent user enumeration.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The email failed structural validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password hashing or verification failed.
    #[error("password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Underlying repository failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
