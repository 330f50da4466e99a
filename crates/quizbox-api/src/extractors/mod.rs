//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::{AuthUser, RequestContext};
pub use json::ValidatedJson;
