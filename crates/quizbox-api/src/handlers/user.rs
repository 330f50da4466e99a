//! User profile handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::request::UpdateUserRequest;
use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.account_service.profile(id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state
        .account_service
        .update_profile(auth.user_id, id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}
