//! Retry classification shared by every remote backend.

use std::time::Duration;

/// How a failed request is retried: exponential backoff from
/// `initial_backoff`, doubling up to `max_delay`, at most `max_retries` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryStrategy {
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Retries after the first attempt
    pub max_retries: usize,
    /// Cap on any single delay
    pub max_delay: Duration,
}

impl RetryStrategy {
    /// Strategy for errors that do not ask for anything specific.
    pub const STANDARD: Self = Self::new(2000, 3, 30);

    /// Build a strategy from milliseconds, a retry count and seconds.
    pub const fn new(initial_backoff_ms: u64, max_retries: usize, max_delay_secs: u64) -> Self {
        Self {
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_retries,
            max_delay: Duration::from_secs(max_delay_secs),
        }
    }

    /// Replace the backoff and retry count where an override is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use masal_error::RetryStrategy;
    /// use std::time::Duration;
    ///
    /// let strategy = RetryStrategy::STANDARD.with_overrides(Some(10), None);
    /// assert_eq!(strategy.initial_backoff, Duration::from_millis(10));
    /// assert_eq!(strategy.max_retries, RetryStrategy::STANDARD.max_retries);
    /// ```
    pub fn with_overrides(self, backoff_ms: Option<u64>, max_retries: Option<usize>) -> Self {
        Self {
            initial_backoff: backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(self.initial_backoff),
            max_retries: max_retries.unwrap_or(self.max_retries),
            max_delay: self.max_delay,
        }
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Errors that know whether, and how, to retry the request that caused them.
///
/// # Examples
///
/// ```
/// use masal_error::{GeminiError, GeminiErrorKind, RetryableError};
///
/// let err = GeminiError::new(GeminiErrorKind::HttpError {
///     status_code: 429,
///     message: "Resource exhausted".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// assert_eq!(err.retry_strategy().max_retries, 3);
/// ```
pub trait RetryableError {
    /// Returns true if the same request may succeed later.
    fn is_retryable(&self) -> bool;

    /// Backoff to use when retrying.
    fn retry_strategy(&self) -> RetryStrategy {
        RetryStrategy::STANDARD
    }
}
