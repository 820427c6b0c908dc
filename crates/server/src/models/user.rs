//! User domain types.

use chrono::{DateTime, Utc};

use tangelo_core::{Email, UserId};

/// A registered user (domain type).
///
/// The password digest never appears here; repositories hand it out
/// separately to the auth service and nowhere else.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address (unique, matched case-sensitively).
    pub email: Email,
    /// Whether the user may perform catalog writes.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
