//! Rate limiter built on governor and a Tokio semaphore.
//!
//! - Governor (GCRA) enforces RPM, TPM and RPD
//! - A semaphore enforces the concurrent request limit

use crate::Tier;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use masal_error::{RetryStrategy, RetryableError};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_retry2::strategy::{ExponentialFactorBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, info, warn};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter that enforces multiple quota types.
///
/// The limiter owns a value implementing [`Tier`] and configures itself from
/// it. Clones share the same quotas.
///
/// # Example
///
/// ```
/// use masal_rate_limit::{RateLimiter, TierConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let limiter = RateLimiter::new(TierConfig::unlimited());
/// let guard = limiter.acquire(100).await;
/// drop(guard);
/// # }
/// ```
#[derive(Clone)]
pub struct RateLimiter<T: Tier> {
    inner: T,
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    tpm_limiter: Option<Arc<DirectRateLimiter>>,
    rpd_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent_semaphore: Arc<Semaphore>,
    backoff_override: Option<u64>,
    retries_override: Option<usize>,
}

impl<T: Tier> std::fmt::Debug for RateLimiter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("tier", &self.inner.name())
            .field("rpm", &self.inner.rpm())
            .field("max_concurrent", &self.inner.max_concurrent())
            .finish()
    }
}

impl<T: Tier> RateLimiter<T> {
    /// Create a new rate limiter from a tier.
    ///
    /// Every limit the tier reports as `Some` is enforced.
    pub fn new(tier: T) -> Self {
        if tier.is_unlimited() {
            debug!(tier = tier.name(), "No rate limits configured");
        }

        let rpm_limiter = tier.rpm().and_then(|rpm| {
            NonZeroU32::new(rpm).map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))))
        });

        // Governor quotas are u32; cap larger token budgets.
        let tpm_limiter = tier.tpm().and_then(|tpm| {
            NonZeroU32::new(tpm.min(u32::MAX as u64) as u32)
                .map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))))
        });

        // The whole daily allowance may be spent at once; it refills evenly over a day.
        let rpd_limiter = tier.rpd().and_then(NonZeroU32::new).and_then(|n| {
            Quota::with_period(Duration::from_secs(86_400) / n.get())
                .map(|quota| Arc::new(GovernorRateLimiter::direct(quota.allow_burst(n))))
        });

        let max_concurrent = tier
            .max_concurrent()
            .map(|n| n.max(1) as usize)
            .unwrap_or(Semaphore::MAX_PERMITS);
        let concurrent_semaphore = Arc::new(Semaphore::new(max_concurrent));

        Self {
            inner: tier,
            rpm_limiter,
            tpm_limiter,
            rpd_limiter,
            concurrent_semaphore,
            backoff_override: None,
            retries_override: None,
        }
    }

    /// Force the initial backoff or retry count regardless of the error.
    pub fn with_retry_overrides(
        mut self,
        backoff_ms: Option<u64>,
        max_retries: Option<usize>,
    ) -> Self {
        self.backoff_override = backoff_ms;
        self.retries_override = max_retries;
        self
    }

    /// Strategy used after `error`, with any overrides applied.
    pub fn strategy_for<E: RetryableError>(&self, error: &E) -> RetryStrategy {
        error
            .retry_strategy()
            .with_overrides(self.backoff_override, self.retries_override)
    }

    /// The tier this limiter enforces.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Wait until every limit allows one more request.
    ///
    /// The returned guard holds a concurrent slot until dropped.
    pub async fn acquire(&self, estimated_tokens: u64) -> RateLimiterGuard {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        if let Some(limiter) = &self.tpm_limiter {
            let tokens = NonZeroU32::new(estimated_tokens.min(u32::MAX as u64) as u32)
                .unwrap_or(NonZeroU32::MIN);
            // A request larger than the whole budget only waits for one cell.
            if limiter.until_n_ready(tokens).await.is_err() {
                limiter.until_ready().await;
            }
        }

        if let Some(limiter) = &self.rpd_limiter {
            limiter.until_ready().await;
        }

        // Concurrent slot last, so it is not held while waiting on quotas.
        let permit = self.concurrent_semaphore.clone().acquire_owned().await.ok();

        RateLimiterGuard { _permit: permit }
    }

    /// Try to acquire without waiting.
    ///
    /// Returns `None` if any limit would block.
    pub fn try_acquire(&self, estimated_tokens: u64) -> Option<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.check().ok()?;
        }

        if let Some(limiter) = &self.tpm_limiter {
            let tokens = NonZeroU32::new(estimated_tokens.min(u32::MAX as u64) as u32)
                .unwrap_or(NonZeroU32::MIN);
            limiter.check_n(tokens).ok()?.ok()?;
        }

        if let Some(limiter) = &self.rpd_limiter {
            limiter.check().ok()?;
        }

        let permit = self.concurrent_semaphore.clone().try_acquire_owned().ok()?;

        Some(RateLimiterGuard {
            _permit: Some(permit),
        })
    }

    /// Execute an operation under rate limiting with retry on transient errors.
    ///
    /// The first failure picks the backoff through [`RateLimiter::strategy_for`].
    /// Permanent errors return immediately.
    pub async fn execute<F, Fut, R, E>(&self, estimated_tokens: u64, operation: F) -> Result<R, E>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
        E: RetryableError + std::fmt::Display,
    {
        let operation = &operation;
        let attempt = move || async move {
            let _guard = self.acquire(estimated_tokens).await;
            operation().await
        };

        let error = match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        if !error.is_retryable() {
            warn!(error = %error, "Permanent error, failing immediately");
            return Err(error);
        }

        let strategy = self.strategy_for(&error);
        if strategy.max_retries == 0 {
            return Err(error);
        }
        info!(
            error = %error,
            tier = self.inner.name(),
            initial_backoff_ms = strategy.initial_backoff.as_millis() as u64,
            max_retries = strategy.max_retries,
            "Request failed, retrying with backoff"
        );

        let mut delays = backoff_schedule(&strategy).map(jitter);

        // The failed attempt above counts as the first; wait its delay here.
        if let Some(delay) = delays.next() {
            tokio::time::sleep(delay).await;
        }

        Retry::spawn(delays, move || async move {
            attempt().await.map_err(|e| {
                if e.is_retryable() {
                    debug!(error = %e, "Transient error, will retry");
                    RetryError::Transient {
                        err: e,
                        retry_after: None,
                    }
                } else {
                    warn!(error = %e, "Permanent error, failing immediately");
                    RetryError::Permanent(e)
                }
            })
        })
        .await
    }
}

/// Delays between retries before jitter: the initial backoff, doubling each
/// time up to the strategy's cap, once per allowed retry.
///
/// ```
/// use masal_error::RetryStrategy;
/// use masal_rate_limit::backoff_schedule;
/// use std::time::Duration;
///
/// let delays: Vec<_> = backoff_schedule(&RetryStrategy::new(1000, 4, 3)).collect();
/// assert_eq!(
///     delays,
///     [1000, 2000, 3000, 3000].map(Duration::from_millis)
/// );
/// ```
pub fn backoff_schedule(strategy: &RetryStrategy) -> impl Iterator<Item = Duration> + use<> {
    let initial_ms = (strategy.initial_backoff.as_millis() as u64).max(1);
    ExponentialFactorBackoff::from_millis(initial_ms, 2.0)
        .max_delay(strategy.max_delay)
        .take(strategy.max_retries)
}

/// RAII guard for the rate limiter.
///
/// Releases the concurrent request slot when dropped.
#[derive(Debug)]
pub struct RateLimiterGuard {
    _permit: Option<tokio::sync::OwnedSemaphorePermit>,
}
