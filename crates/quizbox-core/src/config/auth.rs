//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric key for token signing (HMAC-SHA256). Has no default;
    /// startup fails when it is empty.
    #[serde(default)]
    pub jwt_secret: String,
    /// Absolute token lifetime in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// Minutes after issuance at which a token should be renewed.
    #[serde(default = "default_refresh_after")]
    pub refresh_after_minutes: u64,
    /// Server-side session lifetime in hours. `None` leaves `expires_at`
    /// unset so the session only ends on logout.
    #[serde(default)]
    pub session_ttl_hours: Option<u64>,
    /// PBKDF2 iteration count for newly hashed passwords.
    #[serde(default = "default_iterations")]
    pub password_hash_iterations: u32,
    /// Minimum password length (after trimming).
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Register new accounts as `unverified` instead of `active`.
    #[serde(default)]
    pub require_email_verification: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl(),
            refresh_after_minutes: default_refresh_after(),
            session_ttl_hours: None,
            password_hash_iterations: default_iterations(),
            password_min_length: default_password_min(),
            require_email_verification: false,
        }
    }
}

fn default_token_ttl() -> u64 {
    24 * 365
}

fn default_refresh_after() -> u64 {
    60
}

fn default_iterations() -> u32 {
    24_000
}

fn default_password_min() -> usize {
    8
}
