//! Password policy enforcement for new passwords.

use quizbox_core::config::auth::AuthConfig;
use quizbox_core::error::AppError;

/// Validates new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length, counted after trimming.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against the policy.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.trim().chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().all(|c| c.is_ascii_graphic()) {
            return Err(AppError::validation(
                "password may only contain printable characters without spaces",
            ));
        }

        Ok(())
    }

    /// Validates that the confirmation repeats the password.
    pub fn validate_confirmation(
        &self,
        password: &str,
        confirmation: &str,
    ) -> Result<(), AppError> {
        if password != confirmation {
            return Err(AppError::validation("passwords do not match"));
        }
        Ok(())
    }
}
