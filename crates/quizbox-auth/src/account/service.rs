//! Registration and self-service profile operations.

use std::sync::Arc;

use tracing::info;

use quizbox_core::config::auth::AuthConfig;
use quizbox_core::error::AppError;
use quizbox_core::result::AppResult;
use quizbox_entity::user::{CreateUser, UpdateUser, User, UserStatus};

use crate::password::{PasswordHasher, PasswordValidator};
use crate::store::CredentialStore;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Input for replacing a user's profile fields.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Creates accounts and lets users manage their own profile.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    password_hasher: Arc<PasswordHasher>,
    password_validator: PasswordValidator,
    /// Status given to newly registered users.
    initial_status: UserStatus,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("initial_status", &self.initial_status)
            .finish()
    }
}

impl AccountService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        password_hasher: Arc<PasswordHasher>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            store,
            password_hasher,
            password_validator: PasswordValidator::new(config),
            initial_status: if config.require_email_verification {
                UserStatus::Unverified
            } else {
                UserStatus::Active
            },
        }
    }

    /// Registers a new user.
    ///
    /// Names and email are trimmed and the email lowercased before the
    /// duplicate check. The password is hashed; the plaintext is dropped.
    pub async fn register(&self, registration: Registration) -> AppResult<User> {
        let first_name = required(&registration.first_name, "first name")?;
        let last_name = required(&registration.last_name, "last name")?;
        let email = required(&registration.email, "email")?.to_lowercase();

        self.password_validator.validate(&registration.password)?;
        self.password_validator
            .validate_confirmation(&registration.password, &registration.password_confirmation)?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("that email is already registered"));
        }

        let user = self
            .store
            .create_user(&CreateUser {
                first_name,
                last_name,
                email,
                password_hash: self.password_hasher.hash_password(&registration.password),
                status: self.initial_status,
            })
            .await?;

        info!(user_id = user.id, status = %user.status, "User registered");
        Ok(user)
    }

    /// Fetches a user's public profile.
    pub async fn profile(&self, user_id: i64) -> AppResult<User> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Replaces the profile of `user_id` on behalf of `actor_id`.
    ///
    /// Users may only edit their own profile.
    pub async fn update_profile(
        &self,
        actor_id: i64,
        user_id: i64,
        update: ProfileUpdate,
    ) -> AppResult<User> {
        if actor_id != user_id {
            return Err(AppError::authorization("you can only update your own profile"));
        }

        let user = self
            .store
            .update_user(&UpdateUser {
                id: user_id,
                first_name: required(&update.first_name, "first name")?,
                last_name: required(&update.last_name, "last name")?,
                email: required(&update.email, "email")?.to_lowercase(),
            })
            .await?;

        info!(user_id = user.id, "User profile updated");
        Ok(user)
    }
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}
