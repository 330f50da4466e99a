//! Auth handlers: register, login, logout, current session.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use quizbox_auth::ClientInfo;

use crate::AUTH_TOKEN_HEADER;
use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse, SessionResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::middleware::RequestMeta;
use crate::state::AppState;

/// POST /api/v1/users
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let user = state.account_service.register(req.into()).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// POST /api/v1/users/login
///
/// The token is returned both in the body and in `X-Auth-Token`.
pub async fn login(
    State(state): State<AppState>,
    meta: RequestMeta,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .session_manager
        .login(&req.email, &req.password, &ClientInfo::from(&meta))
        .await?;

    let token = result.token.token;
    let body = LoginResponse {
        token: token.clone(),
        expires_at: result.token.claims.expires_at(),
        user: result.user.into(),
    };

    Ok(([(AUTH_TOKEN_HEADER, token)], Json(ApiResponse::ok(body))).into_response())
}

/// DELETE /api/v1/users/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.session_manager.logout(auth.session_id).await?;

    Ok(Json(ApiResponse::message("logged out")))
}

/// GET /api/v1/session
pub async fn current_session(auth: AuthUser) -> Json<ApiResponse<SessionResponse>> {
    Json(ApiResponse::ok(SessionResponse {
        session_id: auth.session_id,
        user_id: auth.user_id,
        status: auth.user_status,
        token_expires_at: auth.claims.expires_at(),
        token_refresh_at: auth.claims.refresh_at(),
    }))
}
