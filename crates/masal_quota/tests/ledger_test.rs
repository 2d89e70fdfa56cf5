//! Tests for the quota ledger.

use chrono::TimeDelta;
use masal_core::QuotaPolicy;
use masal_quota::{
    Clock, LedgerRecord, ManualClock, PROMO_KEY, PromoRejection, QUOTA_KEY, QuotaLedger,
};
use masal_error::{MasalResult, StorageError, StorageErrorKind};
use masal_storage::{InMemoryStore, JsonFileStore, KeyValueStore};
use std::sync::Arc;

type TestLedger = QuotaLedger<Arc<InMemoryStore>, Arc<ManualClock>>;

fn ledger() -> (TestLedger, Arc<InMemoryStore>, Arc<ManualClock>) {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(ManualClock::default());
    let ledger = QuotaLedger::with_clock(store.clone(), clock.clone(), QuotaPolicy::default());
    (ledger, store, clock)
}

#[test]
fn first_time_user_has_full_quota() -> anyhow::Result<()> {
    let (ledger, store, _) = ledger();

    let status = ledger.check_quota()?;
    assert_eq!(*status.remaining(), 1);
    assert!(status.reset_time().is_none());
    assert!(!ledger.is_promo_redeemed()?);
    assert!(store.is_empty());
    Ok(())
}

#[test]
fn consumption_starts_the_cycle() -> anyhow::Result<()> {
    let (ledger, _, clock) = ledger();

    let status = ledger.decrement_quota()?;
    assert_eq!(*status.remaining(), 0);
    assert!(status.is_exhausted());
    assert_eq!(*status.reset_time(), Some(clock.now() + TimeDelta::hours(6)));
    assert_eq!(
        status.time_until_reset(clock.now()),
        Some(std::time::Duration::from_secs(6 * 3600))
    );
    Ok(())
}

#[test]
fn check_is_idempotent_within_a_cycle() -> anyhow::Result<()> {
    let (ledger, store, clock) = ledger();
    ledger.decrement_quota()?;
    let persisted = store.get(QUOTA_KEY)?;

    clock.advance(TimeDelta::hours(5));
    for _ in 0..3 {
        assert!(ledger.check_quota()?.is_exhausted());
    }
    assert_eq!(store.get(QUOTA_KEY)?, persisted);
    Ok(())
}

#[test]
fn quota_resets_at_the_boundary() -> anyhow::Result<()> {
    let (ledger, _, clock) = ledger();
    ledger.decrement_quota()?;

    clock.advance(TimeDelta::hours(6));
    let status = ledger.check_quota()?;
    assert_eq!(*status.remaining(), 1);
    assert!(status.reset_time().is_none());
    assert_eq!(ledger.load()?, LedgerRecord::default());
    Ok(())
}

#[test]
fn second_consumption_keeps_the_reset_time() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(ManualClock::default());
    let policy = QuotaPolicy::builder().limit(3).build();
    let ledger = QuotaLedger::with_clock(store, clock.clone(), policy);

    let first = ledger.decrement_quota()?;
    clock.advance(TimeDelta::minutes(30));
    let second = ledger.decrement_quota()?;

    assert_eq!(*second.remaining(), 1);
    assert_eq!(first.reset_time(), second.reset_time());
    Ok(())
}

#[test]
fn promo_grants_one_credit_once() -> anyhow::Result<()> {
    let (ledger, store, _) = ledger();
    ledger.decrement_quota()?;
    let before = ledger.load()?;

    let status = ledger.apply_promo("  ankara ")?.map_err(anyhow::Error::msg)?;
    assert_eq!(*status.remaining(), 1);
    assert_eq!(*status.reset_time(), before.reset_time);
    assert_eq!(store.get(PROMO_KEY)?.as_deref(), Some("true"));

    let again = ledger.apply_promo("K7L2M9")?;
    assert_eq!(again, Err(PromoRejection::AlreadyRedeemed));
    assert_eq!(*ledger.check_quota()?.remaining(), 1);
    Ok(())
}

#[test]
fn invalid_promo_leaves_storage_untouched() -> anyhow::Result<()> {
    let (ledger, store, _) = ledger();
    ledger.decrement_quota()?;
    let persisted = store.get(QUOTA_KEY)?;

    assert_eq!(ledger.apply_promo("FREE")?, Err(PromoRejection::InvalidCode));
    assert_eq!(ledger.apply_promo("")?, Err(PromoRejection::InvalidCode));
    assert_eq!(store.get(QUOTA_KEY)?, persisted);
    assert_eq!(store.get(PROMO_KEY)?, None);
    Ok(())
}

#[test]
fn promo_credit_is_banked_before_the_cycle_starts() -> anyhow::Result<()> {
    let (ledger, _, _) = ledger();

    let status = ledger.apply_promo("X4P8R3")?.map_err(anyhow::Error::msg)?;
    assert_eq!(*status.remaining(), 2);
    assert!(status.reset_time().is_none());

    // Spending banked credit does not start the cycle.
    let status = ledger.decrement_quota()?;
    assert_eq!(*status.remaining(), 1);
    assert!(status.reset_time().is_none());

    let status = ledger.decrement_quota()?;
    assert_eq!(*status.remaining(), 0);
    assert!(status.reset_time().is_some());
    Ok(())
}

#[test]
fn promo_flag_survives_reset() -> anyhow::Result<()> {
    let (ledger, _, clock) = ledger();
    ledger.decrement_quota()?;
    ledger.apply_promo("ANKARA")?.map_err(anyhow::Error::msg)?;

    clock.advance(TimeDelta::hours(7));
    assert_eq!(*ledger.check_quota()?.remaining(), 1);
    assert!(ledger.is_promo_redeemed()?);
    assert_eq!(
        ledger.apply_promo("ANKARA")?,
        Err(PromoRejection::AlreadyRedeemed)
    );
    Ok(())
}

#[test]
fn unreadable_record_counts_as_first_time_user() -> anyhow::Result<()> {
    let (ledger, store, _) = ledger();
    store.set(QUOTA_KEY, "{broken")?;

    assert_eq!(*ledger.check_quota()?.remaining(), 1);
    Ok(())
}

#[test]
fn record_uses_millisecond_json() -> anyhow::Result<()> {
    let (ledger, store, clock) = ledger();
    ledger.decrement_quota()?;

    let raw = store
        .get(QUOTA_KEY)?
        .ok_or_else(|| anyhow::anyhow!("record missing"))?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(value["count"], 1);
    assert_eq!(
        value["resetTime"],
        (clock.now() + TimeDelta::hours(6)).timestamp_millis()
    );

    let fresh: LedgerRecord = serde_json::from_str(r#"{"count":-1,"resetTime":null}"#)?;
    assert_eq!(fresh.count, -1);
    assert!(fresh.reset_time.is_none());
    Ok(())
}

#[test]
fn ledger_persists_in_a_file() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("storage.json");

    let ledger = QuotaLedger::new(JsonFileStore::open(&path)?, QuotaPolicy::default());
    ledger.decrement_quota()?;

    let reopened = QuotaLedger::new(JsonFileStore::open(&path)?, QuotaPolicy::default());
    assert!(reopened.check_quota()?.is_exhausted());
    Ok(())
}

#[test]
fn rejections_read_as_sentences() {
    assert!(PromoRejection::InvalidCode.to_string().contains("not valid"));
    assert!(
        PromoRejection::AlreadyRedeemed
            .to_string()
            .contains("already")
    );
}

/// Store that refuses writes to one key.
struct ReadOnlyKey {
    inner: InMemoryStore,
    key: &'static str,
}

impl KeyValueStore for ReadOnlyKey {
    fn get(&self, key: &str) -> MasalResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> MasalResult<()> {
        if key == self.key {
            return Err(StorageError::new(StorageErrorKind::FileWrite(key.to_string())).into());
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> MasalResult<()> {
        self.inner.remove(key)
    }
}

fn ledger_refusing(key: &'static str) -> QuotaLedger<Arc<ReadOnlyKey>> {
    let store = Arc::new(ReadOnlyKey {
        inner: InMemoryStore::new(),
        key,
    });
    QuotaLedger::new(store, QuotaPolicy::default())
}

#[test]
fn failed_flag_write_grants_no_credit() -> anyhow::Result<()> {
    let ledger = ledger_refusing(PROMO_KEY);

    assert!(ledger.apply_promo("ANKARA").is_err());
    assert_eq!(*ledger.check_quota()?.remaining(), 1);
    assert_eq!(ledger.load()?, LedgerRecord::default());
    Ok(())
}

#[test]
fn failed_credit_write_still_spends_the_code() -> anyhow::Result<()> {
    let ledger = ledger_refusing(QUOTA_KEY);

    assert!(ledger.apply_promo("ANKARA").is_err());
    assert!(ledger.is_promo_redeemed()?);
    assert_eq!(
        ledger.apply_promo("K7L2M9")?,
        Err(PromoRejection::AlreadyRedeemed)
    );
    Ok(())
}
