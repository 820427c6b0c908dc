//! Database operations for the Tangelo `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Signup/login identities with bcrypt password digests
//! - `products` - The catalog
//!
//! The schema is created by the embedded migration in `migrations/`,
//! applied once at startup.
//!
//! Queries are bound at runtime (no compile-time database required) and
//! decode through `#[derive(sqlx::FromRow)]` row types that convert into
//! the domain types in [`crate::models`].

pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use products::{ProductQuery, ProductRepository, SortBy, SortOrder};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
