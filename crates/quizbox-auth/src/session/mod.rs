//! Session lifecycle management.

pub mod manager;

pub use manager::{ClientInfo, LoginResult, SessionManager};
