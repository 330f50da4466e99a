//! Credential persistence behind a trait seam.
//!
//! The session manager and access guard only talk to [`CredentialStore`];
//! production wires [`PgCredentialStore`], tests and single-node demos use
//! [`MemoryCredentialStore`].

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use quizbox_core::result::AppResult;
use quizbox_entity::session::{CreateSession, Session, SessionGrant};
use quizbox_entity::user::{CreateUser, UpdateUser, User, UserStatus};

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// Persists users and sessions.
///
/// Every method is a single atomic store operation; implementations must
/// not hold locks across calls.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Find a user by email, ignoring case.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Insert a user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, data: &CreateUser) -> AppResult<User>;

    /// Replace a user's profile fields. Fails with `Conflict` if the new
    /// email belongs to someone else.
    async fn update_user(&self, data: &UpdateUser) -> AppResult<User>;

    /// Change a user's account status.
    async fn set_user_status(&self, id: i64, status: UserStatus) -> AppResult<()>;

    /// Insert a session.
    async fn create_session(&self, data: &CreateSession) -> AppResult<Session>;

    /// Find a session by primary key.
    async fn find_session(&self, id: i64) -> AppResult<Option<Session>>;

    /// Load a session with its owner's current status in one lookup.
    async fn find_session_grant(&self, id: i64) -> AppResult<Option<SessionGrant>>;

    /// Set `last_refreshed_at`.
    async fn touch_session(&self, id: i64, at: DateTime<Utc>) -> AppResult<()>;

    /// Set `deactivated_at` unless already set. Returns whether this call
    /// performed the transition.
    async fn deactivate_session(&self, id: i64, at: DateTime<Utc>) -> AppResult<bool>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
