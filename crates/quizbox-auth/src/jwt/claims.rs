//! Claims carried by a session token.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use quizbox_entity::user::UserStatus;

use crate::error::TokenError;

/// Claims payload of every session token.
///
/// Timestamps are seconds since the Unix epoch. `refresh` is always
/// earlier than `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Absolute expiry.
    #[serde(deserialize_with = "deserialize_number")]
    pub exp: i64,
    /// Time after which the token should be renewed.
    #[serde(deserialize_with = "deserialize_number")]
    pub refresh: i64,
    /// Session this token stands for.
    #[serde(deserialize_with = "deserialize_number")]
    pub session_id: i64,
    /// Owner status at issuance. Informational; the stored status wins.
    pub status: UserStatus,
    /// Owner of the session.
    #[serde(deserialize_with = "deserialize_number")]
    pub user_id: i64,
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the refresh-by time as a `DateTime<Utc>`.
    pub fn refresh_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.refresh, 0)
    }

    /// Checks whether the token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Checks whether the token should be renewed at `now`.
    pub fn requires_refresh_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.refresh
    }

    /// Rejects claim sets that decode but cannot name a real session.
    pub(crate) fn ensure_well_formed(&self) -> Result<(), TokenError> {
        if self.session_id <= 0 {
            return Err(TokenError::Malformed("session_id must be positive".into()));
        }
        if self.user_id <= 0 {
            return Err(TokenError::Malformed("user_id must be positive".into()));
        }
        if self.refresh > self.exp {
            return Err(TokenError::Malformed("refresh is later than exp".into()));
        }
        Ok(())
    }
}

/// Accepts a JSON integer or float for an `i64` claim.
///
/// Floats are truncated toward zero. Strings, booleans, nulls, and
/// non-finite or out-of-range numbers are rejected.
fn deserialize_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(NumberVisitor)
}

struct NumberVisitor;

impl Visitor<'_> for NumberVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or floating-point number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        // i64::MAX is not exactly representable; 2^63 is the first float out of range.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if v.is_finite() && v >= -LIMIT && v < LIMIT {
            Ok(v.trunc() as i64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }
}
