//! Quota outcomes reported to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot of the remaining quota.
///
/// `remaining` may exceed the policy limit after promo credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    /// Stories that may still be created in this cycle.
    remaining: i64,
    /// When the current cycle ends, if it has started.
    reset_time: Option<DateTime<Utc>>,
}

impl QuotaStatus {
    /// Creates a status.
    pub fn new(remaining: i64, reset_time: Option<DateTime<Utc>>) -> Self {
        Self {
            remaining,
            reset_time,
        }
    }

    /// Returns true if no story may be created.
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }

    /// Time left until the cycle resets, if a reset is scheduled.
    ///
    /// Zero once the reset time has passed.
    pub fn time_until_reset(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.reset_time
            .map(|reset| (reset - now).to_std().unwrap_or(Duration::ZERO))
    }
}

/// Why a story request was refused before generation started.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub enum QuotaRejection {
    /// No stories left in this cycle.
    QuotaExhausted {
        /// When the quota refills, if known.
        reset_time: Option<DateTime<Utc>>,
    },
}

impl std::fmt::Display for QuotaRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotaRejection::QuotaExhausted {
                reset_time: Some(reset),
            } => write!(
                f,
                "You have used all your stories for now. New stories unlock at {}.",
                reset.format("%Y-%m-%d %H:%M UTC")
            ),
            QuotaRejection::QuotaExhausted { reset_time: None } => {
                write!(f, "You have used all your stories for now.")
            }
        }
    }
}

/// Why a promo code was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::Error)]
pub enum PromoRejection {
    /// Code is not on the allow-list.
    #[display("That promo code is not valid.")]
    InvalidCode,
    /// This device already redeemed a code.
    #[display("A promo code has already been used on this device.")]
    AlreadyRedeemed,
}
