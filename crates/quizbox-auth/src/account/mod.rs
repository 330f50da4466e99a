//! Account registration and profile management.

pub mod service;

pub use service::{AccountService, ProfileUpdate, Registration};
