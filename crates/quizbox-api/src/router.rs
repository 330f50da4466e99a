//! Route definitions for the GoQuizbox HTTP API.
//!
//! User and session routes are mounted under `/api/v1`; the health probe
//! sits at the root. Guards are attached per route with `route_layer`, so
//! unmatched paths still 404 rather than 401.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and per-request middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(user_routes(&state))
        .merge(session_routes(&state));

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(health_routes())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(axum_middleware::from_fn(middleware::request_context))
        .with_state(state)
}

/// Registration, login, logout, and profiles.
fn user_routes(state: &AppState) -> Router<AppState> {
    let active_user =
        axum_middleware::from_fn_with_state(state.clone(), middleware::allow_only_active_user);
    let ending_session = axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::allow_only_active_user_without_renewal,
    );

    Router::new()
        .route("/users", post(handlers::auth::register))
        .route("/users/login", post(handlers::auth::login))
        .route(
            "/users/logout",
            delete(handlers::auth::logout).route_layer(ending_session),
        )
        .route(
            "/users/{id}",
            get(handlers::user::get_user)
                .merge(put(handlers::user::update_user).route_layer(active_user)),
        )
}

/// Session introspection; open to unverified and inactive users.
fn session_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/session",
        get(handlers::auth::current_session).route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::allow_with_session,
        )),
    )
}

/// Liveness probe. `get` also answers `HEAD`.
fn health_routes() -> Router<AppState> {
    Router::new().route("/healthz", get(handlers::health::health))
}
