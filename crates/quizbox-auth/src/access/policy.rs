//! The validity predicate applied to every protected request.

use chrono::{DateTime, Utc};

use quizbox_entity::session::SessionGrant;

use crate::error::AuthError;
use crate::jwt::Claims;

/// Which callers a protected route admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Valid session owned by an `active` user; stale tokens are renewed.
    ActiveUser,
    /// Same checks as [`AccessPolicy::ActiveUser`] without renewal, for
    /// routes that end the session they run under.
    ActiveUserNoRenewal,
    /// Valid session regardless of owner status; tokens are not renewed.
    AnySession,
}

impl AccessPolicy {
    /// Whether the owner must currently be `active`.
    pub fn requires_active_user(&self) -> bool {
        matches!(self, Self::ActiveUser | Self::ActiveUserNoRenewal)
    }

    /// Whether tokens past their refresh-by time are renewed in flight.
    pub fn renews_tokens(&self) -> bool {
        matches!(self, Self::ActiveUser)
    }
}

/// Decides whether a decoded token may act through the stored session.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. the session exists
/// 2. it belongs to the user named in the token
/// 3. the owner is active (unless the policy is [`AccessPolicy::AnySession`])
/// 4. it has not been deactivated
/// 5. its server-side expiry, if any, has not passed
pub fn check_grant(
    claims: &Claims,
    grant: Option<&SessionGrant>,
    policy: AccessPolicy,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    let grant = grant.ok_or(AuthError::SessionNotFound)?;

    if grant.user_id != claims.user_id {
        return Err(AuthError::UserMismatch);
    }
    if policy.requires_active_user() && !grant.user_status.is_active() {
        return Err(AuthError::UserInactive);
    }
    if grant.is_deactivated() {
        return Err(AuthError::SessionDeactivated);
    }
    if grant.is_expired_at(now) {
        return Err(AuthError::SessionExpired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quizbox_entity::user::UserStatus;

    fn claims(session_id: i64, user_id: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            exp: now + 3_600,
            refresh: now + 60,
            session_id,
            status: UserStatus::Active,
            user_id,
        }
    }

    fn grant(user_id: i64, status: UserStatus) -> SessionGrant {
        SessionGrant {
            id: 42,
            user_id,
            deactivated_at: None,
            expires_at: None,
            last_refreshed_at: Utc::now(),
            user_status: status,
        }
    }

    #[test]
    fn test_valid_grant_passes() {
        let g = grant(7, UserStatus::Active);
        let result = check_grant(&claims(42, 7), Some(&g), AccessPolicy::ActiveUser, Utc::now());
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_session() {
        let result = check_grant(&claims(42, 7), None, AccessPolicy::AnySession, Utc::now());
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[test]
    fn test_user_mismatch_is_checked_before_status() {
        let g = grant(8, UserStatus::Inactive);
        let result = check_grant(&claims(42, 7), Some(&g), AccessPolicy::ActiveUser, Utc::now());
        assert!(matches!(result, Err(AuthError::UserMismatch)));
    }

    #[test]
    fn test_status_only_matters_for_active_policy() {
        let g = grant(7, UserStatus::Unverified);
        let now = Utc::now();
        assert!(matches!(
            check_grant(&claims(42, 7), Some(&g), AccessPolicy::ActiveUser, now),
            Err(AuthError::UserInactive)
        ));
        assert!(matches!(
            check_grant(&claims(42, 7), Some(&g), AccessPolicy::ActiveUserNoRenewal, now),
            Err(AuthError::UserInactive)
        ));
        assert!(check_grant(&claims(42, 7), Some(&g), AccessPolicy::AnySession, now).is_ok());
    }

    #[test]
    fn test_only_active_user_policy_renews() {
        assert!(AccessPolicy::ActiveUser.renews_tokens());
        assert!(!AccessPolicy::ActiveUserNoRenewal.renews_tokens());
        assert!(!AccessPolicy::AnySession.renews_tokens());
    }

    #[test]
    fn test_deactivated_session_is_rejected_under_every_policy() {
        let mut g = grant(7, UserStatus::Active);
        g.deactivated_at = Some(Utc::now() - Duration::minutes(5));
        for policy in [
            AccessPolicy::ActiveUser,
            AccessPolicy::ActiveUserNoRenewal,
            AccessPolicy::AnySession,
        ] {
            assert!(matches!(
                check_grant(&claims(42, 7), Some(&g), policy, Utc::now()),
                Err(AuthError::SessionDeactivated)
            ));
        }
    }

    #[test]
    fn test_server_side_expiry() {
        let now = Utc::now();
        let mut g = grant(7, UserStatus::Active);
        g.expires_at = Some(now - Duration::seconds(1));
        assert!(matches!(
            check_grant(&claims(42, 7), Some(&g), AccessPolicy::AnySession, now),
            Err(AuthError::SessionExpired)
        ));
    }
}
