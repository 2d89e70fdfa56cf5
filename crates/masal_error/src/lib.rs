//! Error types shared by the Masal crates.
//!
//! Each layer has its own error: a `*ErrorKind` enum naming the condition and
//! a `*Error` struct that records where it was raised through
//! `#[track_caller]`. [`MasalError`] wraps any of them so `?` works across
//! crate boundaries.
//!
//! Quota exhaustion and rejected promo codes are expected outcomes, not
//! errors, and live in the quota crate as plain values.
//!
//! ```
//! use masal_error::{ConfigError, MasalResult};
//!
//! fn page_count(configured: u32) -> MasalResult<u32> {
//!     if configured == 0 {
//!         return Err(ConfigError::in_section("models", "page_count must be at least 1").into());
//!     }
//!     Ok(configured)
//! }
//!
//! assert!(page_count(0).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod gemini;
mod json;
mod pipeline;
mod retry;
mod storage;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{MasalError, MasalErrorKind, MasalResult};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use json::JsonError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use retry::{RetryStrategy, RetryableError};
pub use storage::{StorageError, StorageErrorKind};
