//! User account status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account status for a user.
///
/// The common path is `unverified -> active`; `inactive` is reached by
/// administrative action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Registered but the email address is not confirmed yet.
    Unverified,
    /// Account is active and can log in.
    Active,
    /// Account is deactivated.
    Inactive,
}

impl UserStatus {
    /// Check if this status grants access to active-only endpoints.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
