//! # Token Model
//!
//! The cached bearer token, the policy deciding how long it is trusted,
//! and the clock used to judge expiry.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Mutex;

/// Seconds subtracted from the token lifetime so refresh happens before real expiry
pub const TOKEN_BUFFER_SECS: i64 = 5;

/// Assumed `expires_in` when the OAuth response omits it
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.lock() = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.lock();
        *now += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        // A poisoned guard still holds a valid timestamp
        self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

/// A bearer token and the instant it stops being trusted
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Valid only while `now` is strictly before `expires_at`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Remaining validity in whole seconds (0 if already expired)
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("value", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Computes how long a freshly issued token is cached:
/// `min(expires_in, margin) - buffer`, never below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimePolicy {
    pub margin_secs: i64,
    pub buffer_secs: i64,
    pub default_expires_in_secs: i64,
}

impl TokenLifetimePolicy {
    pub fn new(margin_secs: u64) -> Self {
        Self {
            margin_secs: i64::try_from(margin_secs).unwrap_or(i64::MAX),
            buffer_secs: TOKEN_BUFFER_SECS,
            default_expires_in_secs: DEFAULT_EXPIRES_IN_SECS,
        }
    }

    /// Effective lifetime for a token whose server-declared lifetime is `expires_in`
    pub fn effective_lifetime(&self, expires_in: Option<i64>) -> Duration {
        let declared = expires_in.unwrap_or(self.default_expires_in_secs);
        let secs = declared
            .min(self.margin_secs)
            .saturating_sub(self.buffer_secs)
            .max(0);
        Duration::try_seconds(secs).unwrap_or(Duration::MAX)
    }

    /// Whether this policy hands out tokens that are expired on arrival
    pub fn is_degenerate(&self) -> bool {
        self.margin_secs <= self.buffer_secs
    }

    /// Build the cache entry for a token issued at `now`
    pub fn cache(
        &self,
        value: impl Into<String>,
        expires_in: Option<i64>,
        now: DateTime<Utc>,
    ) -> CachedToken {
        let expires_at = now
            .checked_add_signed(self.effective_lifetime(expires_in))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        CachedToken::new(value, expires_at)
    }
}

impl Default for TokenLifetimePolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TOKEN_LIFETIME_SECS)
    }
}
