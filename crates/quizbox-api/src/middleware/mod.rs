//! Axum middleware stack.

pub mod auth;
pub mod context;
pub mod cors;
pub mod logging;

pub use auth::{
    allow_only_active_user, allow_only_active_user_without_renewal, allow_with_session,
};
pub use context::{RequestMeta, request_context};
