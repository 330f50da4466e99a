//! # quizbox-auth
//!
//! Authentication and session management for GoQuizbox.
//!
//! ## Modules
//!
//! - `password`: PBKDF2-SHA256 password hashing and policy enforcement
//! - `jwt`: signed session token issuance and parsing
//! - `store`: credential persistence (PostgreSQL and in-memory)
//! - `session`: session lifecycle (login, refresh, logout)
//! - `access`: per-request session validation and refresh
//! - `account`: registration and profile management

pub mod access;
pub mod account;
pub mod error;
pub mod jwt;
pub mod password;
pub mod session;
pub mod store;

pub use access::{AccessGuard, AccessPolicy, Authorization};
pub use account::{AccountService, ProfileUpdate, Registration};
pub use error::{AuthError, PasswordError, TokenError};
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{ClientInfo, LoginResult, SessionManager};
pub use store::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
