use std::str::FromStr;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Used when `max_uses` is missing or not positive.
pub const DEFAULT_MAX_USES: i64 = 1;

/// Lifetime in days of a code created without an explicit `expiry`.
pub const DEFAULT_TTL_DAYS: i64 = 7;

pub fn default_ttl() -> TimeDelta {
    TimeDelta::days(DEFAULT_TTL_DAYS)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialCode {
    pub id: i64,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub max_uses: i64,
    pub uses_count: i64,
}

impl SerialCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_exhausted(&self) -> bool {
        self.uses_count >= self.max_uses
    }

    /// A code is redeemable iff it has not expired and has uses left.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && !self.is_exhausted()
    }
}

#[derive(Debug, Clone)]
pub struct CreateSerialCode {
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub max_uses: i64,
}

impl CreateSerialCode {
    /// A code created at `now` (cut to whole seconds) that lives for `ttl`.
    ///
    /// Returns `None` when the expiry falls outside the representable range.
    pub fn starting_at(code: String, now: DateTime<Utc>, ttl: TimeDelta, max_uses: i64) -> Option<Self> {
        let created_at = now.trunc_subsecs(0);
        let expires_at = created_at.checked_add_signed(ttl)?;
        Some(CreateSerialCode {
            code,
            created_at,
            expires_at,
            max_uses,
        })
    }
}

/// Result of one redemption attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redemption {
    /// Usage was recorded; carries the row after the increment.
    Redeemed(SerialCode),
    NotFound,
    Expired { expires_at: DateTime<Utc> },
    LimitReached { max_uses: i64 },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExpiryError {
    #[error("expiry string is empty")]
    Empty,

    #[error("invalid expiry value: {0}")]
    InvalidValue(String),

    #[error("invalid expiry unit: {0}. Use 'd' for days or 'h' for hours")]
    InvalidUnit(String),
}

/// A requested code lifetime such as `7d` or `12H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry(pub TimeDelta);

impl FromStr for Expiry {
    type Err = ExpiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(unit) = s.chars().last() else {
            return Err(ExpiryError::Empty);
        };
        let value_str = &s[..s.len() - unit.len_utf8()];

        let value: i64 = value_str
            .parse()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| ExpiryError::InvalidValue(value_str.to_string()))?;

        let delta = match unit.to_ascii_lowercase() {
            'd' => TimeDelta::try_days(value),
            'h' => TimeDelta::try_hours(value),
            _ => return Err(ExpiryError::InvalidUnit(unit.to_string())),
        };

        delta
            .map(Expiry)
            .ok_or_else(|| ExpiryError::InvalidValue(value_str.to_string()))
    }
}
