//! Session-token middleware.
//!
//! Both guards read `X-Auth-Token`, validate it against the stored session,
//! and leave an [`AuthUser`] in the request extensions. Mount them with
//! `route_layer` on the routes they protect.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use quizbox_auth::error::SESSION_REJECTED_MESSAGE;
use quizbox_auth::{AccessPolicy, AuthError, Authorization};
use quizbox_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::{AuthUser, RequestContext};
use crate::middleware::context::RequestMeta;
use crate::state::AppState;
use crate::AUTH_TOKEN_HEADER;

/// Requires a valid session whose owner is active.
///
/// A token past its refresh-by time is renewed before the handler runs and
/// the replacement is returned in `X-Auth-Token`.
pub async fn allow_only_active_user(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    guard(&state, AccessPolicy::ActiveUser, request, next).await
}

/// Same checks as [`allow_only_active_user`] but never renews, for routes
/// that deactivate the session they run under.
pub async fn allow_only_active_user_without_renewal(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    guard(&state, AccessPolicy::ActiveUserNoRenewal, request, next).await
}

/// Requires a valid session whatever the owner's status. Never renews.
pub async fn allow_with_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    guard(&state, AccessPolicy::AnySession, request, next).await
}

async fn guard(
    state: &AppState,
    policy: AccessPolicy,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    let authorization = state
        .access_guard
        .authorize(token, policy, Utc::now())
        .await
        .map_err(reject)?;

    let meta = request
        .extensions()
        .get::<RequestMeta>()
        .cloned()
        .unwrap_or_default();
    let renewed = authorization
        .refreshed
        .as_ref()
        .map(|issued| issued.token.clone());

    request
        .extensions_mut()
        .insert(AuthUser(context(authorization, meta)));

    let mut response = next.run(request).await;

    if let Some(token) = renewed {
        match HeaderValue::from_str(&token) {
            Ok(value) => {
                response.headers_mut().insert(AUTH_TOKEN_HEADER, value);
            }
            Err(e) => tracing::error!(error = %e, "Renewed token is not a valid header value"),
        }
    }

    Ok(response)
}

/// Every session failure gets the same answer; only a missing token and
/// infrastructure errors keep their own.
fn reject(err: AuthError) -> ApiError {
    if err.is_missing_token() || err.is_store_failure() {
        err.into()
    } else {
        AppError::authentication(SESSION_REJECTED_MESSAGE).into()
    }
}

fn context(authorization: Authorization, meta: RequestMeta) -> RequestContext {
    RequestContext {
        user_id: authorization.user_id(),
        session_id: authorization.session_id(),
        user_status: authorization.user_status,
        claims: authorization.claims,
        ip_address: meta.ip_address,
        user_agent: meta.user_agent,
        request_id: meta.request_id,
    }
}
