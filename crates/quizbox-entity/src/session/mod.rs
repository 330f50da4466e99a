//! Session domain entities.

pub mod grant;
pub mod model;

pub use grant::SessionGrant;
pub use model::{CreateSession, Session};
