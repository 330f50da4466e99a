//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A login session.
///
/// Sessions are created on login, have `last_refreshed_at` bumped on
/// every token renewal, and are deactivated on logout. Rows are never
/// deleted; a non-null `deactivated_at` is terminal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: i64,
    /// The user this session belongs to.
    pub user_id: i64,
    /// When the session was revoked, if it was.
    pub deactivated_at: Option<DateTime<Utc>>,
    /// Absolute server-side expiry. `None` means no time bound.
    pub expires_at: Option<DateTime<Utc>>,
    /// Client address at login.
    pub ip_address: String,
    /// Last time a token was issued for this session.
    pub last_refreshed_at: DateTime<Utc>,
    /// User-Agent header at login.
    pub user_agent: String,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session has been revoked.
    pub fn is_deactivated(&self) -> bool {
        self.deactivated_at.is_some()
    }

    /// Check whether the server-side expiry has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// The user this session belongs to.
    pub user_id: i64,
    /// Client address.
    pub ip_address: String,
    /// User-Agent header.
    pub user_agent: String,
    /// Initial refresh time, normally the login time.
    pub last_refreshed_at: DateTime<Utc>,
    /// Server-side expiry, if sessions are time bounded.
    pub expires_at: Option<DateTime<Utc>>,
}
