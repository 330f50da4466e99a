//! Per-request session validation.

pub mod guard;
pub mod policy;

pub use guard::{AccessGuard, Authorization};
pub use policy::{AccessPolicy, check_grant};
