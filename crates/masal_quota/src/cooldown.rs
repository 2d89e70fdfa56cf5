//! Short lock between stories.

use crate::{Clock, SystemClock};
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, instrument};

/// In-memory cooldown armed after each generated story.
///
/// The gate is advisory and lives only as long as the process; a restart
/// clears it.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use masal_quota::{CooldownGate, ManualClock};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = Arc::new(ManualClock::default());
/// let gate = CooldownGate::with_clock(clock.clone());
///
/// gate.arm(Duration::from_secs(60));
/// assert!(gate.is_locked());
/// assert_eq!(gate.seconds_left(), 60);
///
/// clock.advance(TimeDelta::milliseconds(59_500));
/// assert_eq!(gate.seconds_left(), 1);
///
/// clock.advance(TimeDelta::seconds(1));
/// assert!(!gate.is_locked());
/// ```
#[derive(Debug, Default)]
pub struct CooldownGate<C = SystemClock> {
    clock: C,
    target: Mutex<Option<DateTime<Utc>>>,
}

impl CooldownGate<SystemClock> {
    /// An unlocked gate on wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> CooldownGate<C> {
    /// An unlocked gate reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            target: Mutex::new(None),
        }
    }

    fn target_slot(&self) -> MutexGuard<'_, Option<DateTime<Utc>>> {
        self.target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lock the gate for `duration` from now.
    #[instrument(skip(self))]
    pub fn arm(&self, duration: Duration) {
        let delta = TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX);
        let now = self.clock.now();
        let target = now
            .checked_add_signed(delta)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        *self.target_slot() = Some(target);
        debug!(%target, "Cooldown armed");
    }

    /// Unlock the gate immediately.
    pub fn clear(&self) {
        *self.target_slot() = None;
    }

    /// When the gate unlocks, if it is armed.
    pub fn target(&self) -> Option<DateTime<Utc>> {
        *self.target_slot()
    }

    /// Returns true while the gate is armed and its target is in the future.
    ///
    /// An expired target is cleared.
    pub fn is_locked(&self) -> bool {
        self.remaining().is_some()
    }

    /// Whole seconds until the gate unlocks, rounded up; zero when unlocked.
    pub fn seconds_left(&self) -> u64 {
        self.remaining()
            .map(|left| {
                let millis = left.num_milliseconds().max(1) as u64;
                millis.div_ceil(1000)
            })
            .unwrap_or(0)
    }

    fn remaining(&self) -> Option<TimeDelta> {
        let mut slot = self.target_slot();
        let target = (*slot)?;
        let left = target - self.clock.now();
        if left > TimeDelta::zero() {
            Some(left)
        } else {
            *slot = None;
            None
        }
    }

    /// Wait until the gate unlocks, reporting seconds left every `tick`.
    ///
    /// Returns immediately if the gate is not locked. The first report is
    /// made without waiting.
    pub async fn countdown<F>(&self, tick: Duration, mut on_tick: F)
    where
        F: FnMut(u64),
    {
        let mut interval = tokio::time::interval(tick.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let left = self.seconds_left();
            if left == 0 {
                self.clear();
                debug!("Cooldown finished");
                return;
            }
            on_tick(left);
        }
    }
}
