//! Gemini-specific error types.

use crate::{RetryStrategy, RetryableError};

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// API key not found in environment
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Failed to create the HTTP client
    #[display("Failed to create Gemini client: {}", _0)]
    ClientCreation(String),
    /// API request failed before a response arrived
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Response body did not match the expected shape
    #[display("Unexpected Gemini response: {}", _0)]
    InvalidResponse(String),
    /// Response was cut short by a safety filter or similar
    #[display("Gemini response blocked: {}", _0)]
    Blocked(String),
}

impl GeminiErrorKind {
    /// Returns true for rate limiting, overload, timeouts and dropped connections.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiErrorKind::HttpError { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            GeminiErrorKind::ApiRequest(_) => true,
            _ => false,
        }
    }

    /// Backoff suited to this failure.
    ///
    /// Quota errors wait longest; the image model answers 503 under load and
    /// usually recovers within seconds.
    pub fn retry_strategy(&self) -> RetryStrategy {
        match self {
            GeminiErrorKind::HttpError { status_code: 429, .. } => RetryStrategy::new(5000, 3, 40),
            GeminiErrorKind::HttpError { status_code: 503, .. } => RetryStrategy::new(2000, 4, 30),
            GeminiErrorKind::HttpError {
                status_code: 500 | 502 | 504,
                ..
            } => RetryStrategy::new(1000, 3, 8),
            GeminiErrorKind::ApiRequest(_) => RetryStrategy::new(1000, 3, 10),
            _ => RetryStrategy::STANDARD,
        }
    }
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use masal_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for GeminiError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy(&self) -> RetryStrategy {
        self.kind.retry_strategy()
    }
}
