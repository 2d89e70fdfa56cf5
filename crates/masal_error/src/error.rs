//! The crate-wide error and result types.

use crate::{BuilderError, ConfigError, GeminiError, JsonError, PipelineError, StorageError};

/// Which layer an error came from.
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MasalErrorKind {
    /// Reading or writing a JSON document
    #[from(JsonError)]
    Json(JsonError),
    /// Loading or validating settings
    #[from(ConfigError)]
    Config(ConfigError),
    /// Assembling a value through its builder
    #[from(BuilderError)]
    Builder(BuilderError),
    /// The key-value store
    #[from(StorageError)]
    Storage(StorageError),
    /// A Gemini request
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Story generation
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Error returned by every fallible Masal operation.
///
/// The kind is boxed so `MasalResult` stays one pointer wide on the error path.
/// Anything convertible into [`MasalErrorKind`] converts into `MasalError`,
/// so `?` works directly on the layer errors:
///
/// ```
/// use masal_error::{ConfigError, MasalErrorKind, MasalResult};
///
/// fn page_count(raw: &str) -> MasalResult<u32> {
///     match raw.parse() {
///         Ok(0) | Err(_) => Err(ConfigError::in_section("models", "page_count must be a positive integer"))?,
///         Ok(n) => Ok(n),
///     }
/// }
///
/// let err = page_count("zero").unwrap_err();
/// assert!(matches!(err.kind(), MasalErrorKind::Config(_)));
/// assert!(err.to_string().contains("[models]"));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Masal Error: {}", _0)]
pub struct MasalError(Box<MasalErrorKind>);

impl MasalError {
    /// Wrap a kind.
    pub fn new(kind: MasalErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// The layer-specific error inside.
    pub fn kind(&self) -> &MasalErrorKind {
        &self.0
    }

    /// True for Gemini failures that may succeed if the request is sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), MasalErrorKind::Gemini(e) if e.kind.is_retryable())
    }
}

impl<T> From<T> for MasalError
where
    T: Into<MasalErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result alias used across the workspace.
pub type MasalResult<T> = std::result::Result<T, MasalError>;
