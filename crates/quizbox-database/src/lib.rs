//! # quizbox-database
//!
//! PostgreSQL connection management, migrations, and the user and
//! session repositories.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
