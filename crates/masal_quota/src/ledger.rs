//! Persistent story quota with one-time promo credit.

use crate::{Clock, PromoRejection, QuotaStatus, SystemClock};
use chrono::{DateTime, TimeDelta, Utc};
use masal_core::QuotaPolicy;
use masal_error::{JsonError, MasalResult};
use masal_storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Storage key of the ledger record.
pub const QUOTA_KEY: &str = "masal_quota";

/// Storage key of the promo redemption flag.
pub const PROMO_KEY: &str = "masal_promo_used";

/// Persisted ledger record.
///
/// Stored as `{"count": 1, "resetTime": 1735689600000}` with the reset time in
/// epoch milliseconds. `count` goes negative when promo credit is banked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    /// Stories consumed this cycle, minus promo credit.
    pub count: i64,
    /// End of the current cycle; `None` until the first paid story.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub reset_time: Option<DateTime<Utc>>,
}

impl LedgerRecord {
    /// The fresh record if this cycle has ended at `now`.
    pub fn rolled_over(&self, now: DateTime<Utc>) -> Option<LedgerRecord> {
        match self.reset_time {
            Some(reset) if reset <= now => Some(LedgerRecord::default()),
            _ => None,
        }
    }

    /// The record after one story is consumed at `now`.
    ///
    /// The cycle starts on the first consumption that leaves a positive count;
    /// spending banked promo credit does not start it.
    pub fn consumed(&self, now: DateTime<Utc>, period: TimeDelta) -> LedgerRecord {
        let count = self.count + 1;
        let reset_time = match self.reset_time {
            None if count > 0 => Some(
                now.checked_add_signed(period)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            ),
            existing => existing,
        };
        LedgerRecord { count, reset_time }
    }

    /// The record after one promo credit is granted.
    pub fn credited(&self) -> LedgerRecord {
        LedgerRecord {
            count: self.count - 1,
            reset_time: self.reset_time,
        }
    }
}

/// Story quota persisted in a key-value store.
///
/// Each operation reads the record, applies one transition and writes it back.
/// The sequence is not atomic across processes sharing a store.
///
/// # Examples
///
/// ```
/// use masal_core::QuotaPolicy;
/// use masal_quota::QuotaLedger;
/// use masal_storage::InMemoryStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let ledger = QuotaLedger::new(InMemoryStore::new(), QuotaPolicy::default());
///
/// assert_eq!(*ledger.check_quota()?.remaining(), 1);
/// let after = ledger.decrement_quota()?;
/// assert!(after.is_exhausted());
/// assert!(after.reset_time().is_some());
///
/// let credited = ledger.apply_promo(" ankara ")?;
/// assert_eq!(credited.map(|s| *s.remaining()), Ok(1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QuotaLedger<S, C = SystemClock> {
    store: S,
    clock: C,
    policy: QuotaPolicy,
}

impl<S: KeyValueStore> QuotaLedger<S, SystemClock> {
    /// Ledger over `store` using wall-clock time.
    pub fn new(store: S, policy: QuotaPolicy) -> Self {
        Self::with_clock(store, SystemClock, policy)
    }
}

impl<S: KeyValueStore, C: Clock> QuotaLedger<S, C> {
    /// Ledger over `store` reading time from `clock`.
    pub fn with_clock(store: S, clock: C, policy: QuotaPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    /// The quota policy in force.
    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// The clock this ledger reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current remaining quota, rolling the cycle over if its reset time has passed.
    ///
    /// Only a rollover writes to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self))]
    pub fn check_quota(&self) -> MasalResult<QuotaStatus> {
        let record = self.load()?;

        let record = match record.rolled_over(self.clock.now()) {
            Some(fresh) => {
                info!(previous_count = record.count, "Quota cycle ended, resetting");
                self.save(&fresh)?;
                fresh
            }
            None => record,
        };

        let status = self.status(&record);
        debug!(remaining = status.remaining(), "Checked quota");
        Ok(status)
    }

    /// Consume one story.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self))]
    pub fn decrement_quota(&self) -> MasalResult<QuotaStatus> {
        let period = TimeDelta::from_std(self.policy.reset_period()).unwrap_or(TimeDelta::MAX);
        let record = self.load()?.consumed(self.clock.now(), period);
        self.save(&record)?;

        let status = self.status(&record);
        info!(
            remaining = status.remaining(),
            reset_time = ?status.reset_time(),
            "Consumed one story"
        );
        Ok(status)
    }

    /// Redeem a promo code for one extra story.
    ///
    /// The code is trimmed and uppercased before lookup. A rejection leaves
    /// the store untouched; the outer error only reports storage failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self, code))]
    pub fn apply_promo(&self, code: &str) -> MasalResult<Result<QuotaStatus, PromoRejection>> {
        if !self.policy.is_valid_code(code) {
            debug!("Rejected unknown promo code");
            return Ok(Err(PromoRejection::InvalidCode));
        }

        if self.is_promo_redeemed()? {
            debug!("Rejected promo code, device already redeemed one");
            return Ok(Err(PromoRejection::AlreadyRedeemed));
        }

        // Flag before credit, so a failed write never leaves the code redeemable.
        let record = self.load()?.credited();
        self.store.set(PROMO_KEY, "true")?;
        self.save(&record)?;

        let status = self.status(&record);
        info!(remaining = status.remaining(), "Redeemed promo code");
        Ok(Ok(status))
    }

    /// Returns true if this device has redeemed a promo code.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_promo_redeemed(&self) -> MasalResult<bool> {
        Ok(self.store.get(PROMO_KEY)?.as_deref() == Some("true"))
    }

    /// Read the ledger record; absent or unreadable records count as a first-time user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(&self) -> MasalResult<LedgerRecord> {
        let Some(raw) = self.store.get(QUOTA_KEY)? else {
            return Ok(LedgerRecord::default());
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Ok(record),
            Err(e) => {
                warn!(error = %e, "Unreadable quota record, starting fresh");
                Ok(LedgerRecord::default())
            }
        }
    }

    fn save(&self, record: &LedgerRecord) -> MasalResult<()> {
        let raw = serde_json::to_string(record)
            .map_err(|e| JsonError::new("quota record", e.to_string()))?;
        self.store.set(QUOTA_KEY, &raw)
    }

    fn status(&self, record: &LedgerRecord) -> QuotaStatus {
        QuotaStatus::new(self.policy.limit() - record.count, record.reset_time)
    }
}
