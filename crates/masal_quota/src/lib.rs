//! Usage gating for story creation.
//!
//! - [`QuotaLedger`] counts stories per quota cycle in a local
//!   [`KeyValueStore`](masal_storage::KeyValueStore) and redeems one-time promo codes
//! - [`CooldownGate`] is a short in-memory lock armed after each story
//!
//! Both read time through a [`Clock`] so behavior can be tested without waiting.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod cooldown;
mod ledger;
mod status;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cooldown::CooldownGate;
pub use ledger::{LedgerRecord, PROMO_KEY, QUOTA_KEY, QuotaLedger};
pub use status::{PromoRejection, QuotaRejection, QuotaStatus};
