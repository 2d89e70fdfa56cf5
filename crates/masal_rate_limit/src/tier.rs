//! Request limits of one API plan.

/// Limits a rate limiter enforces for one plan. `None` means no limit.
///
/// ```
/// use masal_rate_limit::Tier;
///
/// struct Trial;
///
/// impl Tier for Trial {
///     fn name(&self) -> &str { "trial" }
///     fn rpm(&self) -> Option<u32> { Some(5) }
///     fn tpm(&self) -> Option<u64> { None }
///     fn rpd(&self) -> Option<u32> { Some(20) }
///     fn max_concurrent(&self) -> Option<u32> { Some(1) }
/// }
///
/// assert!(!Trial.is_unlimited());
/// ```
pub trait Tier: Send + Sync {
    /// Plan label used in logs.
    fn name(&self) -> &str;

    /// Requests per minute.
    fn rpm(&self) -> Option<u32>;

    /// Estimated tokens per minute.
    fn tpm(&self) -> Option<u64>;

    /// Requests per day.
    fn rpd(&self) -> Option<u32>;

    /// Requests in flight at once.
    fn max_concurrent(&self) -> Option<u32>;

    /// True when no limit applies at all.
    fn is_unlimited(&self) -> bool {
        self.rpm().is_none()
            && self.tpm().is_none()
            && self.rpd().is_none()
            && self.max_concurrent().is_none()
    }
}
