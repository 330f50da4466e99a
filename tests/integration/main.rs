//! HTTP-level tests driving the full router against the in-memory store.

mod auth_test;
mod helpers;
mod session_test;
mod user_test;
