//! # quizbox-api
//!
//! HTTP API layer for GoQuizbox built on Axum.
//!
//! Provides the user and session endpoints, the session-token middleware
//! (`X-Auth-Token`), request context, CORS, logging, extractors, DTOs, and
//! error mapping into the `{success, message, data}` envelope.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;

/// Header carrying the session token in both directions.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Header carrying the request ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
