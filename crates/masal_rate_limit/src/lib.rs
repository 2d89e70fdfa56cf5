//! Rate limiting and configuration.
//!
//! Every call to a generation backend passes through a [`RateLimiter`] built
//! from a [`TierConfig`]. Tier limits, model names and the usage policies are
//! loaded together as a [`MasalConfig`] from bundled defaults and optional
//! user overrides.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod tier;

pub use config::{MasalConfig, ModelLimits, ModelsConfig, ProviderConfig, TierConfig};
pub use limiter::{RateLimiter, RateLimiterGuard, backoff_schedule};
pub use tier::Tier;
