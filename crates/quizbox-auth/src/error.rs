//! Authentication domain errors and their mapping into [`AppError`].

use thiserror::Error;

use quizbox_core::error::AppError;

/// Message returned for every rejected session, whatever the cause.
pub const SESSION_REJECTED_MESSAGE: &str = "failed to validate session, you have to log in";

/// Message returned when the auth header is absent.
pub const TOKEN_MISSING_MESSAGE: &str = "authentication token not provided";

/// Message returned for an unknown email or a wrong password.
pub const BAD_CREDENTIALS_MESSAGE: &str = "invalid email or password";

/// Errors from verifying a stored password hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// The stored hash is not a `pbkdf2_sha256$<iter>$<salt>$<key>` string.
    #[error("malformed password hash: {0}")]
    MalformedHash(&'static str),
    /// The password does not match the hash.
    #[error("password does not match")]
    Mismatch,
}

/// Errors from parsing a session token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature check failed (tampered, corrupted, wrong key or algorithm).
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Signature is valid but the claims are missing, mistyped, or out of range.
    #[error("token claims are malformed: {0}")]
    Malformed(String),
}

/// Failures of login, refresh, logout, and per-request session checks.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token was supplied with the request.
    #[error("authentication token not provided")]
    TokenNotProvided,
    #[error(transparent)]
    Token(#[from] TokenError),
    /// The token's absolute expiry has passed.
    #[error("token has expired")]
    TokenExpired,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid password")]
    InvalidPassword,
    #[error("user email is not verified")]
    UserUnverified,
    #[error("user is not active")]
    UserInactive,
    #[error("session not found")]
    SessionNotFound,
    #[error("session has been deactivated")]
    SessionDeactivated,
    #[error("session has expired")]
    SessionExpired,
    /// The session belongs to a different user than the token claims.
    #[error("session does not belong to the token user")]
    UserMismatch,
    /// Persistence or other infrastructure failure.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl AuthError {
    /// Whether this error means "no credentials" rather than "bad credentials".
    pub fn is_missing_token(&self) -> bool {
        matches!(self, Self::TokenNotProvided)
    }

    /// Whether this error originates from infrastructure rather than the caller.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenNotProvided => AppError::authentication(TOKEN_MISSING_MESSAGE),
            AuthError::UserNotFound | AuthError::InvalidPassword => {
                AppError::authentication(BAD_CREDENTIALS_MESSAGE)
            }
            AuthError::UserUnverified => {
                AppError::authorization("you have to verify your email before logging in")
            }
            AuthError::UserInactive => AppError::authorization("your account is not active"),
            AuthError::Token(_)
            | AuthError::TokenExpired
            | AuthError::SessionNotFound
            | AuthError::SessionDeactivated
            | AuthError::SessionExpired
            | AuthError::UserMismatch => AppError::authentication(SESSION_REJECTED_MESSAGE),
            AuthError::Store(e) => e,
        }
    }
}
