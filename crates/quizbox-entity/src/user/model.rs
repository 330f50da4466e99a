//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::UserStatus;

/// A registered forum user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address, unique case-insensitively.
    pub email: String,
    /// Account status.
    pub status: UserStatus,
    /// Encoded PBKDF2 password hash. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the email address has been confirmed.
    pub email_verified: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if the user may use endpoints restricted to active accounts.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Initial status.
    pub status: UserStatus,
}

/// Data for updating an existing user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    /// The user ID to update.
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
