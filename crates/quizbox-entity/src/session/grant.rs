//! Session-plus-owner projection used by per-request access checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::user::UserStatus;

/// A session joined with the *current* status of its owning user.
///
/// Loaded in a single query on every protected request so that a user
/// deactivated after token issuance loses access immediately.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionGrant {
    pub id: i64,
    pub user_id: i64,
    pub deactivated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_refreshed_at: DateTime<Utc>,
    /// Owner status as stored now, not as encoded in the token.
    pub user_status: UserStatus,
}

impl SessionGrant {
    /// Check whether the session has been revoked.
    pub fn is_deactivated(&self) -> bool {
        self.deactivated_at.is_some()
    }

    /// Check whether the server-side expiry has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn grant(expires_at: Option<DateTime<Utc>>) -> SessionGrant {
        SessionGrant {
            id: 1,
            user_id: 1,
            deactivated_at: None,
            expires_at,
            last_refreshed_at: Utc::now(),
            user_status: UserStatus::Active,
        }
    }

    #[test]
    fn test_missing_expiry_never_expires() {
        let now = Utc::now();
        assert!(!grant(None).is_expired_at(now + Duration::days(3650)));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        assert!(grant(Some(now)).is_expired_at(now));
        assert!(!grant(Some(now + Duration::seconds(1))).is_expired_at(now));
    }
}
