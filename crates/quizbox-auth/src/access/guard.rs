//! Token-to-session authorization for inbound requests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use quizbox_entity::user::UserStatus;

use super::policy::{AccessPolicy, check_grant};
use crate::error::AuthError;
use crate::jwt::{Claims, IssuedToken, JwtDecoder};
use crate::session::SessionManager;
use crate::store::CredentialStore;

/// Outcome of a successful check.
#[derive(Debug, Clone)]
pub struct Authorization {
    /// Claims of the presented token.
    pub claims: Claims,
    /// Owner status as currently stored.
    pub user_status: UserStatus,
    /// Replacement token when the presented one was due for renewal.
    pub refreshed: Option<IssuedToken>,
}

impl Authorization {
    pub fn user_id(&self) -> i64 {
        self.claims.user_id
    }

    pub fn session_id(&self) -> i64 {
        self.claims.session_id
    }
}

/// Authenticates a bearer token against the stored session.
#[derive(Clone)]
pub struct AccessGuard {
    jwt_decoder: Arc<JwtDecoder>,
    store: Arc<dyn CredentialStore>,
    sessions: Arc<SessionManager>,
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("jwt_decoder", &self.jwt_decoder)
            .finish()
    }
}

impl AccessGuard {
    /// Creates a new guard.
    pub fn new(
        jwt_decoder: Arc<JwtDecoder>,
        store: Arc<dyn CredentialStore>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            jwt_decoder,
            store,
            sessions,
        }
    }

    /// Authorizes a request carrying `token` at time `now`.
    ///
    /// 1. No token -> `TokenNotProvided`
    /// 2. Signature/claims failure or expired token -> rejected without a store lookup
    /// 3. One lookup of session + owner status, then [`check_grant`]
    /// 4. If the policy renews tokens and refresh-by has passed, refresh the
    ///    session; a failed refresh rejects the request
    pub async fn authorize(
        &self,
        token: Option<&str>,
        policy: AccessPolicy,
        now: DateTime<Utc>,
    ) -> Result<Authorization, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::TokenNotProvided)?;

        let claims = self.jwt_decoder.decode(token).inspect_err(|e| {
            debug!(error = %e, "Rejected undecodable session token");
        })?;

        if claims.is_expired_at(now) {
            debug!(
                session_id = claims.session_id,
                user_id = claims.user_id,
                "Rejected expired session token"
            );
            return Err(AuthError::TokenExpired);
        }

        let grant = self.store.find_session_grant(claims.session_id).await?;

        if let Err(e) = check_grant(&claims, grant.as_ref(), policy, now) {
            warn!(
                session_id = claims.session_id,
                user_id = claims.user_id,
                reason = %e,
                "Session validation failed"
            );
            return Err(e);
        }

        let user_status = grant
            .map(|g| g.user_status)
            .ok_or(AuthError::SessionNotFound)?;

        let refreshed = if policy.renews_tokens() && claims.requires_refresh_at(now) {
            let token = self
                .sessions
                .refresh_at(claims.session_id, now)
                .await
                .inspect_err(|e| {
                    warn!(
                        session_id = claims.session_id,
                        user_id = claims.user_id,
                        reason = %e,
                        "In-flight token refresh failed"
                    );
                })?;
            Some(token)
        } else {
            None
        };

        Ok(Authorization {
            claims,
            user_status,
            refreshed,
        })
    }
}
