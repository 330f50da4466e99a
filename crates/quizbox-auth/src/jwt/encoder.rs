//! Session token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use quizbox_core::config::auth::AuthConfig;
use quizbox_core::error::AppError;
use quizbox_entity::user::UserStatus;

use super::claims::Claims;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWS string sent in `X-Auth-Token`.
    pub token: String,
    /// Claims signed into `token`.
    pub claims: Claims,
}

/// Creates signed HS256 session tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Absolute token lifetime.
    token_ttl: Duration,
    /// Delay after issuance before renewal is due.
    refresh_after: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("token_ttl", &self.token_ttl)
            .field("refresh_after", &self.refresh_after)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails when no signing key is configured.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        if config.jwt_secret.is_empty() {
            return Err(AppError::configuration("JWT signing key is not configured"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl: Duration::hours(config.token_ttl_hours as i64),
            refresh_after: Duration::minutes(config.refresh_after_minutes as i64),
        })
    }

    /// Issues a token for a session, anchored at `now`.
    pub fn issue(
        &self,
        session_id: i64,
        user_id: i64,
        status: UserStatus,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let claims = Claims {
            exp: (now + self.token_ttl).timestamp(),
            refresh: (now + self.refresh_after).timestamp(),
            session_id,
            status,
            user_id,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok(IssuedToken { token, claims })
    }
}
