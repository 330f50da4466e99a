//! User repository implementation.

use sqlx::PgPool;

use quizbox_core::error::{AppError, ErrorKind};
use quizbox_core::result::AppResult;
use quizbox_entity::user::{CreateUser, UpdateUser, User, UserStatus};

/// Name of the unique index on `LOWER(email)`.
const EMAIL_UNIQUE_INDEX: &str = "users_email_lower_key";

/// Repository for user CRUD and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// Insert a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (first_name, last_name, email, status, password_hash, email_verified) \
             VALUES ($1, $2, $3, $4, $5, FALSE) RETURNING *",
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(data.status)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_email_conflict(e, "Failed to create user"))
    }

    /// Update a user's profile fields.
    pub async fn update(&self, data: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET first_name = $2, last_name = $3, email = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(data.id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_email_conflict(e, "Failed to update user"))?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", data.id)))
    }

    /// Change a user's account status.
    pub async fn update_status(&self, id: i64, status: UserStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update user status", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }
}

fn map_email_conflict(e: sqlx::Error, context: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(EMAIL_UNIQUE_INDEX) => {
            AppError::conflict("that email is already registered")
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}
