//! PostgreSQL-backed credential store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use quizbox_core::result::AppResult;
use quizbox_database::connection;
use quizbox_database::repositories::{SessionRepository, UserRepository};
use quizbox_entity::session::{CreateSession, Session, SessionGrant};
use quizbox_entity::user::{CreateUser, UpdateUser, User, UserStatus};

use super::CredentialStore;

/// Credential store over the user and session repositories.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
    users: Arc<UserRepository>,
    sessions: Arc<SessionRepository>,
}

impl PgCredentialStore {
    /// Creates a store sharing the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            pool,
        }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.find_by_email(email).await
    }

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn create_user(&self, data: &CreateUser) -> AppResult<User> {
        self.users.create(data).await
    }

    async fn update_user(&self, data: &UpdateUser) -> AppResult<User> {
        self.users.update(data).await
    }

    async fn set_user_status(&self, id: i64, status: UserStatus) -> AppResult<()> {
        self.users.update_status(id, status).await
    }

    async fn create_session(&self, data: &CreateSession) -> AppResult<Session> {
        self.sessions.create(data).await
    }

    async fn find_session(&self, id: i64) -> AppResult<Option<Session>> {
        self.sessions.find_by_id(id).await
    }

    async fn find_session_grant(&self, id: i64) -> AppResult<Option<SessionGrant>> {
        self.sessions.find_grant(id).await
    }

    async fn touch_session(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        self.sessions.touch_refreshed(id, at).await
    }

    async fn deactivate_session(&self, id: i64, at: DateTime<Utc>) -> AppResult<bool> {
        self.sessions.deactivate(id, at).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        connection::ping(&self.pool).await
    }
}
