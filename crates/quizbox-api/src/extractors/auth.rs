//! `AuthUser` extractor: the context left behind by the session middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use quizbox_auth::Claims;
use quizbox_auth::error::TOKEN_MISSING_MESSAGE;
use quizbox_core::error::AppError;
use quizbox_entity::user::UserStatus;

use crate::error::ApiError;

/// Identity of the caller behind a validated session.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: i64,
    pub session_id: i64,
    /// Owner status as currently stored.
    pub user_status: UserStatus,
    pub claims: Claims,
    pub ip_address: String,
    pub user_agent: String,
    pub request_id: String,
}

/// Extracted authenticated user context available in handlers.
///
/// Only present on routes behind [`allow_only_active_user`] or
/// [`allow_with_session`].
///
/// [`allow_only_active_user`]: crate::middleware::allow_only_active_user
/// [`allow_with_session`]: crate::middleware::allow_with_session
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::from(AppError::authentication(TOKEN_MISSING_MESSAGE)))
    }
}
