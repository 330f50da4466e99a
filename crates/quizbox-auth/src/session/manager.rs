//! Session lifecycle manager: login, refresh, and logout flows.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, warn};

use quizbox_core::config::auth::AuthConfig;
use quizbox_core::error::AppError;
use quizbox_entity::session::{CreateSession, Session};
use quizbox_entity::user::{User, UserStatus};

use crate::error::{AuthError, PasswordError};
use crate::jwt::{IssuedToken, JwtEncoder};
use crate::password::PasswordHasher;
use crate::store::CredentialStore;

/// Client details recorded on the session at login.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// Client address as seen by the server.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// Signed session token.
    pub token: IssuedToken,
    /// The authenticated user.
    pub user: User,
    /// Created session.
    pub session: Session,
}

/// Manages the session lifecycle.
///
/// ```text
/// Created -> Active -> (refresh due) -> Active -> ... -> Deactivated
/// ```
#[derive(Clone)]
pub struct SessionManager {
    /// Credential persistence.
    store: Arc<dyn CredentialStore>,
    /// Token signer.
    jwt_encoder: Arc<JwtEncoder>,
    /// Password hasher.
    password_hasher: Arc<PasswordHasher>,
    /// Server-side session lifetime; `None` leaves sessions unbounded.
    session_ttl: Option<Duration>,
    /// Hash verified on unknown emails so both failures cost one derivation.
    decoy_hash: String,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        jwt_encoder: Arc<JwtEncoder>,
        password_hasher: Arc<PasswordHasher>,
        config: &AuthConfig,
    ) -> Self {
        let decoy_hash = password_hasher.hash_password("quizbox-decoy-password");
        Self {
            store,
            jwt_encoder,
            password_hasher,
            decoy_hash,
            session_ttl: config
                .session_ttl_hours
                .map(|hours| Duration::hours(hours as i64)),
        }
    }

    /// Performs the login flow:
    ///
    /// 1. Find the user by email (case-insensitive)
    /// 2. Verify the password
    /// 3. Check the account status
    /// 4. Create the session row
    /// 5. Issue a token for it
    ///
    /// No session row is written unless steps 1-3 succeed.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client: &ClientInfo,
    ) -> Result<LoginResult, AuthError> {
        let email = email.trim();
        let password = password.trim();

        // Step 1: Find user
        let Some(user) = self.store.find_user_by_email(email).await? else {
            let _ = self.password_hasher.verify_password(password, &self.decoy_hash);
            debug!("Login rejected: unknown email");
            return Err(AuthError::UserNotFound);
        };

        // Step 2: Verify password
        match self
            .password_hasher
            .verify_password(password, &user.password_hash)
        {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                warn!(user_id = user.id, "Login rejected: invalid password");
                return Err(AuthError::InvalidPassword);
            }
            Err(e @ PasswordError::MalformedHash(_)) => {
                error!(user_id = user.id, error = %e, "Stored password hash is unusable");
                return Err(AuthError::Store(AppError::internal(
                    "stored password hash is malformed",
                )));
            }
        }

        // Step 3: Check status
        check_user_status(&user)?;

        // Step 4: Create session
        let now = Utc::now();
        let session = self
            .store
            .create_session(&CreateSession {
                user_id: user.id,
                ip_address: client.ip_address.clone(),
                user_agent: client.user_agent.clone(),
                last_refreshed_at: now,
                expires_at: self.session_ttl.map(|ttl| now + ttl),
            })
            .await?;

        // Step 5: Issue token
        let token = self
            .jwt_encoder
            .issue(session.id, user.id, user.status, now)?;

        info!(
            user_id = user.id,
            session_id = session.id,
            ip = %client.ip_address,
            "Login successful"
        );

        Ok(LoginResult {
            token,
            user,
            session,
        })
    }

    /// Re-issues a token for a session, anchored at the current time.
    pub async fn refresh(&self, session_id: i64) -> Result<IssuedToken, AuthError> {
        self.refresh_at(session_id, Utc::now()).await
    }

    /// Re-issues a token for a session, anchored at `now`.
    ///
    /// 1. Load the session; it must exist and not be deactivated
    /// 2. Load the owner; they must be active
    /// 3. Record `last_refreshed_at = now`
    /// 4. Issue a new token
    pub async fn refresh_at(
        &self,
        session_id: i64,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let session = self
            .store
            .find_session(session_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_deactivated() {
            return Err(AuthError::SessionDeactivated);
        }
        if session.is_expired_at(now) {
            return Err(AuthError::SessionExpired);
        }

        let user = self
            .store
            .find_user_by_id(session.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active() {
            return Err(AuthError::UserInactive);
        }

        self.store.touch_session(session.id, now).await?;

        let token = self
            .jwt_encoder
            .issue(session.id, user.id, user.status, now)?;

        info!(user_id = user.id, session_id = session.id, "Token refreshed");

        Ok(token)
    }

    /// Deactivates a session.
    ///
    /// Idempotent: logging out an already deactivated session succeeds
    /// and leaves the original deactivation time untouched.
    pub async fn logout(&self, session_id: i64) -> Result<(), AuthError> {
        let session = self
            .store
            .find_session(session_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_deactivated() {
            info!(session_id, "Logout on already deactivated session");
            return Ok(());
        }

        let changed = self.store.deactivate_session(session.id, Utc::now()).await?;

        info!(
            user_id = session.user_id,
            session_id = session.id,
            changed,
            "Logout completed"
        );
        Ok(())
    }
}

/// Checks that a user with valid credentials may start a session.
fn check_user_status(user: &User) -> Result<(), AuthError> {
    match user.status {
        UserStatus::Active => Ok(()),
        UserStatus::Unverified => {
            warn!(user_id = user.id, "Login rejected: email not verified");
            Err(AuthError::UserUnverified)
        }
        UserStatus::Inactive => {
            warn!(user_id = user.id, "Login rejected: account inactive");
            Err(AuthError::UserInactive)
        }
    }
}
