//! Usage policies: how many stories a device may create and how long the
//! cooldown after each one lasts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Promo codes accepted out of the box.
pub const DEFAULT_PROMO_CODES: &[&str] = &[
    "ANKARA", "K7L2M9", "X4P8R3", "T9Y5W1", "B2H6S8", "V3N7C4", "J8D5F2", "M6G9Z1", "R4K3L7",
    "S5T8P2", "Y1W9Q6",
];

/// Quota policy for story creation.
///
/// # Examples
///
/// ```
/// use masal_core::QuotaPolicy;
///
/// let policy = QuotaPolicy::default();
/// assert_eq!(*policy.limit(), 1);
/// assert_eq!(policy.reset_period().as_secs(), 6 * 60 * 60);
/// assert!(policy.is_valid_code(" ankara "));
/// assert!(!policy.is_valid_code("NOPE"));
///
/// let generous = QuotaPolicy::builder().limit(3).build();
/// assert_eq!(*generous.limit(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct QuotaPolicy {
    /// Stories allowed per quota cycle (default 1).
    #[serde(default = "default_limit")]
    limit: i64,

    /// Seconds from the first consumption until the quota resets (default 6 h).
    #[serde(default = "default_reset_period_secs")]
    reset_period_secs: u64,

    /// Allow-list of promo codes, compared after trimming and uppercasing.
    #[serde(default = "default_promo_codes")]
    promo_codes: Vec<String>,
}

fn default_limit() -> i64 {
    1
}

fn default_reset_period_secs() -> u64 {
    6 * 60 * 60
}

fn default_promo_codes() -> Vec<String> {
    DEFAULT_PROMO_CODES.iter().map(|c| c.to_string()).collect()
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            reset_period_secs: default_reset_period_secs(),
            promo_codes: default_promo_codes(),
        }
    }
}

impl QuotaPolicy {
    /// Creates a new quota policy builder.
    pub fn builder() -> QuotaPolicyBuilder {
        QuotaPolicyBuilder::default()
    }

    /// Length of a quota cycle.
    pub fn reset_period(&self) -> Duration {
        Duration::from_secs(self.reset_period_secs)
    }

    /// Normalizes a user-entered promo code.
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Returns true if the code is on the allow-list once normalized.
    pub fn is_valid_code(&self, code: &str) -> bool {
        let code = Self::normalize_code(code);
        self.promo_codes.iter().any(|c| *c == code)
    }

    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the limit is below one, the reset period is zero,
    /// or a promo code is not uppercase alphanumeric.
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 {
            return Err(format!("Quota limit must be at least 1, got {}", self.limit));
        }
        if self.reset_period_secs == 0 {
            return Err("Quota reset period must be greater than zero".to_string());
        }
        if let Some(code) = self.promo_codes.iter().find(|c| {
            c.is_empty()
                || !c
                    .chars()
                    .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
        }) {
            return Err(format!(
                "Promo code '{}' must be non-empty uppercase alphanumeric",
                code
            ));
        }
        Ok(())
    }
}

/// Builder for `QuotaPolicy`.
#[derive(Debug, Default)]
pub struct QuotaPolicyBuilder {
    limit: Option<i64>,
    reset_period_secs: Option<u64>,
    promo_codes: Option<Vec<String>>,
}

impl QuotaPolicyBuilder {
    /// Sets the number of stories per cycle.
    pub fn limit(mut self, value: i64) -> Self {
        self.limit = Some(value);
        self
    }

    /// Sets the cycle length in seconds.
    pub fn reset_period_secs(mut self, value: u64) -> Self {
        self.reset_period_secs = Some(value);
        self
    }

    /// Replaces the promo code allow-list.
    pub fn promo_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.promo_codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the `QuotaPolicy`.
    pub fn build(self) -> QuotaPolicy {
        QuotaPolicy {
            limit: self.limit.unwrap_or_else(default_limit),
            reset_period_secs: self
                .reset_period_secs
                .unwrap_or_else(default_reset_period_secs),
            promo_codes: self.promo_codes.unwrap_or_else(default_promo_codes),
        }
    }
}

/// Cooldown applied after each successful story.
///
/// # Examples
///
/// ```
/// use masal_core::CooldownPolicy;
///
/// let policy = CooldownPolicy::default();
/// assert_eq!(policy.duration().as_secs(), 60);
/// assert_eq!(policy.tick().as_millis(), 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct CooldownPolicy {
    /// Seconds the gate stays locked (default 60).
    #[serde(default = "default_cooldown_secs")]
    duration_secs: u64,

    /// Countdown refresh interval in milliseconds (default 1000).
    #[serde(default = "default_tick_millis")]
    tick_millis: u64,
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_tick_millis() -> u64 {
    1000
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            duration_secs: default_cooldown_secs(),
            tick_millis: default_tick_millis(),
        }
    }
}

impl CooldownPolicy {
    /// Creates a new cooldown policy builder.
    pub fn builder() -> CooldownPolicyBuilder {
        CooldownPolicyBuilder::default()
    }

    /// How long the gate stays locked.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// How often the countdown reports.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick interval is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_millis == 0 {
            return Err("Cooldown tick must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Builder for `CooldownPolicy`.
#[derive(Debug, Default)]
pub struct CooldownPolicyBuilder {
    duration_secs: Option<u64>,
    tick_millis: Option<u64>,
}

impl CooldownPolicyBuilder {
    /// Sets the lock duration in seconds.
    pub fn duration_secs(mut self, value: u64) -> Self {
        self.duration_secs = Some(value);
        self
    }

    /// Sets the countdown tick in milliseconds.
    pub fn tick_millis(mut self, value: u64) -> Self {
        self.tick_millis = Some(value);
        self
    }

    /// Builds the `CooldownPolicy`.
    pub fn build(self) -> CooldownPolicy {
        CooldownPolicy {
            duration_secs: self.duration_secs.unwrap_or_else(default_cooldown_secs),
            tick_millis: self.tick_millis.unwrap_or_else(default_tick_millis),
        }
    }
}
