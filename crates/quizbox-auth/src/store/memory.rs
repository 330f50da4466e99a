//! In-memory credential store using a Tokio mutex.
//!
//! Suitable for tests and single-node demos only; nothing survives a
//! restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use quizbox_core::error::AppError;
use quizbox_core::result::AppResult;
use quizbox_entity::session::{CreateSession, Session, SessionGrant};
use quizbox_entity::user::{CreateUser, UpdateUser, User, UserStatus};

use super::CredentialStore;

#[derive(Debug, Default)]
struct InnerState {
    users: BTreeMap<i64, User>,
    sessions: BTreeMap<i64, Session>,
    last_user_id: i64,
    last_session_id: i64,
}

impl InnerState {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| same_email(&u.email, email) && Some(u.id) != except)
    }
}

/// Case-insensitive email comparison matching PostgreSQL `LOWER()`.
fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Credential store kept entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a session row with a caller-chosen id.
    pub async fn insert_session(&self, session: Session) {
        let mut state = self.state.lock().await;
        state.last_session_id = state.last_session_id.max(session.id);
        state.sessions.insert(session.id, session);
    }

    /// Number of session rows, active or not.
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| same_email(&u.email, email))
            .cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn create_user(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if state.email_taken(&data.email, None) {
            return Err(AppError::conflict("that email is already registered"));
        }

        state.last_user_id += 1;
        let user = User {
            id: state.last_user_id,
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            email: data.email.clone(),
            status: data.status,
            password_hash: data.password_hash.clone(),
            email_verified: false,
            created_at: Utc::now(),
            updated_at: None,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, data: &UpdateUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if state.email_taken(&data.email, Some(data.id)) {
            return Err(AppError::conflict("that email is already registered"));
        }

        let user = state
            .users
            .get_mut(&data.id)
            .ok_or_else(|| AppError::not_found(format!("User {} not found", data.id)))?;
        user.first_name = data.first_name.clone();
        user.last_name = data.last_name.clone();
        user.email = data.email.clone();
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }

    async fn set_user_status(&self, id: i64, status: UserStatus) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.status = status;
        user.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn create_session(&self, data: &CreateSession) -> AppResult<Session> {
        let mut state = self.state.lock().await;
        state.last_session_id += 1;
        let session = Session {
            id: state.last_session_id,
            user_id: data.user_id,
            deactivated_at: None,
            expires_at: data.expires_at,
            ip_address: data.ip_address.clone(),
            last_refreshed_at: data.last_refreshed_at,
            user_agent: data.user_agent.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_session(&self, id: i64) -> AppResult<Option<Session>> {
        Ok(self.state.lock().await.sessions.get(&id).cloned())
    }

    async fn find_session_grant(&self, id: i64) -> AppResult<Option<SessionGrant>> {
        let state = self.state.lock().await;
        let Some(session) = state.sessions.get(&id) else {
            return Ok(None);
        };
        // Inner join: a session whose owner is gone yields nothing.
        Ok(state.users.get(&session.user_id).map(|user| SessionGrant {
            id: session.id,
            user_id: session.user_id,
            deactivated_at: session.deactivated_at,
            expires_at: session.expires_at,
            last_refreshed_at: session.last_refreshed_at,
            user_status: user.status,
        }))
    }

    async fn touch_session(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(session) = state.sessions.get_mut(&id) {
            session.last_refreshed_at = at;
            session.updated_at = Some(at);
        }
        Ok(())
    }

    async fn deactivate_session(&self, id: i64, at: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.sessions.get_mut(&id) {
            Some(session) if session.deactivated_at.is_none() => {
                session.deactivated_at = Some(at);
                session.updated_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
