//! Session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use quizbox_core::error::{AppError, ErrorKind};
use quizbox_core::result::AppResult;
use quizbox_entity::session::{CreateSession, Session, SessionGrant};

/// Repository for session CRUD and query operations.
///
/// Sessions are never deleted; logout sets `deactivated_at`.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Load a session together with its owner's current status.
    pub async fn find_grant(&self, id: i64) -> AppResult<Option<SessionGrant>> {
        sqlx::query_as::<_, SessionGrant>(
            "SELECT s.id, s.user_id, s.deactivated_at, s.expires_at, s.last_refreshed_at, \
                    u.status AS user_status \
             FROM sessions s \
             JOIN users u ON u.id = s.user_id \
             WHERE s.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load session grant", e))
    }

    /// Insert a new session.
    pub async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, ip_address, user_agent, last_refreshed_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(data.last_refreshed_at)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Record a token renewal.
    pub async fn touch_refreshed(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET last_refreshed_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update session refresh", e)
            })?;
        Ok(())
    }

    /// Deactivate a session if it is still active.
    ///
    /// Returns `true` when this call performed the transition and `false`
    /// when the session was already deactivated (or does not exist).
    pub async fn deactivate(&self, id: i64, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET deactivated_at = $2, updated_at = $2 \
             WHERE id = $1 AND deactivated_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate session", e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
